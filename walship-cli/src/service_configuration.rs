use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;

use walship_archiver::ArchiveSessionConfig;
use walship_core::StorageLayout;
use walship_storage::{BackendConfig, BlobUploadConfig, CloudBackend, LocalBackend, MirrorConfig};

/// configuration settings loaded from the config file
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LoadConfiguration {
    /// Cluster name, also the default object prefix in the primary store
    pub(crate) cluster_name: String,
    /// WAL directory and batching settings
    pub(crate) archive: ArchiveNode,
    /// Primary blob store configuration
    pub(crate) primary: StoreConfig,
    /// Mirror store sync utility
    pub(crate) mirror: MirrorNode,
    /// Optional streaming upload tuning
    #[serde(default)]
    pub(crate) upload: Option<UploadNode>,
    /// Optional Prometheus exporter address, used by watch mode
    #[serde(default)]
    pub(crate) prom_exporter: Option<String>,
}

/// runtime configuration assembled for the archiving commands
#[derive(Debug, Clone)]
pub(crate) struct ServiceConfiguration {
    /// Cluster name
    pub(crate) cluster_name: String,
    /// WAL directory, batch sizing and watch interval
    pub(crate) session: ArchiveSessionConfig,
    /// Object key layout in the primary store
    pub(crate) layout: StorageLayout,
    /// Primary blob store backend
    pub(crate) primary: BackendConfig,
    /// Streaming upload tuning for the primary store
    pub(crate) blob_upload: BlobUploadConfig,
    /// Mirror store sync utility
    pub(crate) mirror: MirrorConfig,
    /// Prometheus exporter address
    pub(crate) prom_exporter: Option<SocketAddr>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ArchiveNode {
    /// PostgreSQL WAL directory, the one holding archive_status
    pub(crate) wal_dir: String,
    /// Object prefix in the primary store; defaults to the cluster name
    pub(crate) prefix: Option<String>,
    /// Max segments per transfer batch
    pub(crate) batch_limit: Option<usize>,
    /// Skip re-uploading an explicitly requested segment already in the primary store
    pub(crate) check_before_push: Option<bool>,
    /// Backlog scan period for watch mode, in seconds
    pub(crate) watch_interval_seconds: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct UploadNode {
    /// Multipart chunk size in megabytes
    pub(crate) chunk_size_mb: Option<usize>,
    /// Concurrent in-flight chunks per upload
    pub(crate) concurrent: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MirrorNode {
    /// Path of the mirror sync utility binary
    pub(crate) utility: String,
    /// Subcommand passed before the segment path; defaults to "wal-push"
    pub(crate) subcommand: Option<String>,
    /// Per-invocation timeout in seconds; unset means wait indefinitely
    pub(crate) timeout_seconds: Option<u64>,
}

/// Primary store configuration enum (tagged by `backend`)
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "backend")]
pub(crate) enum StoreConfig {
    #[serde(rename = "memory")]
    Memory { root: String },
    #[serde(rename = "fs")]
    Fs { root: String },
    #[serde(rename = "s3")]
    S3 {
        root: String,
        region: Option<String>,
        endpoint: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
    },
    #[serde(rename = "gcs")]
    Gcs {
        root: String,
        endpoint: Option<String>,
        credential_file: Option<String>,
    },
}

/// Implementing the TryFrom trait to transform LoadConfiguration into ServiceConfiguration
impl TryFrom<LoadConfiguration> for ServiceConfiguration {
    type Error = anyhow::Error;

    fn try_from(config: LoadConfiguration) -> Result<Self> {
        let mut session = ArchiveSessionConfig::new(&config.archive.wal_dir);
        if let Some(batch_limit) = config.archive.batch_limit {
            session.batch_limit = batch_limit;
        }
        if let Some(check) = config.archive.check_before_push {
            session.check_before_push = check;
        }
        if let Some(interval) = config.archive.watch_interval_seconds {
            session.watch_interval_seconds = interval;
        }

        // Object prefix falls back to the cluster name
        let prefix = config
            .archive
            .prefix
            .clone()
            .unwrap_or_else(|| config.cluster_name.clone());
        let layout = StorageLayout::new(prefix);

        let mut blob_upload = BlobUploadConfig::default();
        if let Some(upload) = &config.upload {
            if let Some(mb) = upload.chunk_size_mb {
                blob_upload.chunk_size = mb * 1024 * 1024;
            }
            if let Some(concurrent) = upload.concurrent {
                blob_upload.concurrent = concurrent;
            }
        }

        let mut mirror = MirrorConfig::new(&config.mirror.utility);
        if let Some(subcommand) = &config.mirror.subcommand {
            mirror.subcommand = subcommand.clone();
        }
        mirror.timeout_seconds = config.mirror.timeout_seconds;

        let prom_exporter: Option<SocketAddr> = if let Some(addr) = &config.prom_exporter {
            Some(addr.parse().context("Failed to create prom_exporter")?)
        } else {
            None
        };

        Ok(ServiceConfiguration {
            cluster_name: config.cluster_name,
            session,
            layout,
            primary: BackendConfig::from(&config.primary),
            blob_upload,
            mirror,
            prom_exporter,
        })
    }
}

// Provide a conversion from the config file store enum to the storage BackendConfig
impl From<&StoreConfig> for BackendConfig {
    fn from(cfg: &StoreConfig) -> Self {
        match cfg {
            StoreConfig::Memory { root } => BackendConfig::Local {
                backend: LocalBackend::Memory,
                root: root.clone(),
            },
            StoreConfig::Fs { root } => BackendConfig::Local {
                backend: LocalBackend::Fs,
                root: root.clone(),
            },
            StoreConfig::S3 {
                root,
                region,
                endpoint,
                access_key,
                secret_key,
            } => {
                let mut options: HashMap<String, String> = HashMap::new();
                if let Some(v) = region {
                    options.insert("region".into(), v.clone());
                }
                if let Some(v) = endpoint {
                    options.insert("endpoint".into(), v.clone());
                }
                if let Some(v) = access_key {
                    options.insert("access_key".into(), v.clone());
                }
                if let Some(v) = secret_key {
                    options.insert("secret_key".into(), v.clone());
                }
                BackendConfig::Cloud {
                    backend: CloudBackend::S3,
                    root: root.clone(),
                    options,
                }
            }
            StoreConfig::Gcs {
                root,
                endpoint,
                credential_file,
            } => {
                let mut options: HashMap<String, String> = HashMap::new();
                if let Some(v) = endpoint {
                    options.insert("endpoint".into(), v.clone());
                }
                if let Some(v) = credential_file {
                    options.insert("credential_file".into(), v.clone());
                }
                BackendConfig::Cloud {
                    backend: CloudBackend::Gcs,
                    root: root.clone(),
                    options,
                }
            }
        }
    }
}
