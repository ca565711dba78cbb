use std::fs::read_to_string;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use walship_archiver::{ArchiveSession, WalDualUploader};
use walship_core::StorageLayout;
use walship_storage::{BlobStore, WalBlobUploader, WalMirrorUploader};

use crate::service_configuration::{LoadConfiguration, ServiceConfiguration};

/// Arguments shared by every walship subcommand.
#[derive(Debug, Args)]
pub(crate) struct CommonArgs {
    #[arg(long, short = 'c', help = "Path to the configuration file")]
    pub(crate) config_file: String,

    #[arg(long, help = "Override the WAL directory from the config file")]
    pub(crate) wal_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Prometheus exporter address, e.g. 0.0.0.0:9040 (watch mode only)"
    )]
    pub(crate) prom_exporter: Option<String>,
}

/// The session type every archiving subcommand drives: a primary blob store
/// upload and a mirror utility invocation per segment.
pub(crate) type DualSession = ArchiveSession<WalDualUploader<WalBlobUploader, WalMirrorUploader>>;

/// Load the configuration from the YAML file and apply command-line overrides.
pub(crate) fn load_config(common: &CommonArgs) -> Result<ServiceConfiguration> {
    let config_content = read_to_string(Path::new(&common.config_file)).context(format!(
        "Failed to read config file: {}",
        common.config_file
    ))?;
    let load_config: LoadConfiguration = serde_yaml::from_str(&config_content)?;
    let mut service_config: ServiceConfiguration = load_config.try_into()?;

    // If `wal_dir` is provided via command-line args, override the value from the config file
    if let Some(wal_dir) = &common.wal_dir {
        service_config.session.wal_dir = wal_dir.clone();
    }

    // If `prom_exporter` is provided via command-line args, override the value from the config file
    if let Some(prom_exporter) = &common.prom_exporter {
        let prom_address: SocketAddr = prom_exporter.parse().context(format!(
            "Failed to parse into Socket address: {}",
            prom_exporter
        ))?;
        service_config.prom_exporter = Some(prom_address);
    }

    Ok(service_config)
}

/// Primary store handle and key layout, for commands that only query.
pub(crate) fn build_store(config: &ServiceConfiguration) -> Result<(BlobStore, StorageLayout)> {
    let store = BlobStore::new(&config.primary)?;
    Ok((store, config.layout.clone()))
}

/// Wire the dual-store session: primary blob uploader, mirror uploader and,
/// when `check_before_push` is on, the primary-store presence probe.
pub(crate) fn build_session(config: &ServiceConfiguration) -> Result<DualSession> {
    let store = BlobStore::new(&config.primary)?;
    let blob = WalBlobUploader::new(store, config.layout.clone(), config.blob_upload.clone());
    let mirror = WalMirrorUploader::new(config.mirror.clone());

    let presence = Arc::new(blob.clone());
    let transferer = Arc::new(WalDualUploader::new(blob, mirror));

    let mut session = ArchiveSession::new(config.session.clone(), transferer);
    if config.session.check_before_push {
        session = session.with_presence(presence);
    }
    Ok(session)
}
