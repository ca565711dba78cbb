use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use walship_archiver::init_metrics;

use crate::setup::{build_session, load_config, CommonArgs};

#[derive(Debug, Parser)]
pub struct Watch {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Drain the archiving backlog periodically until interrupted.
///
/// On Ctrl-C the watcher stops scanning, runs one final drain and exits.
pub async fn handle_watch(args: Watch) -> Result<()> {
    let config = load_config(&args.common)?;

    // Init metrics with or without prometheus exporter
    init_metrics(config.prom_exporter, config.cluster_name.clone());

    let session = Arc::new(build_session(&config)?);
    let cancel = CancellationToken::new();
    let watcher = session.start_watch(cancel.clone());

    info!(
        target = "walship",
        wal_dir = %config.session.wal_dir.display(),
        interval_seconds = config.session.watch_interval_seconds,
        "watching archiving backlog"
    );

    tokio::signal::ctrl_c().await?;
    info!(target = "walship", "shutdown signal received, draining backlog");

    cancel.cancel();
    watcher.await??;
    Ok(())
}
