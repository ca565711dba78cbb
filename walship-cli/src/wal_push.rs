use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::setup::{build_session, load_config, CommonArgs};

#[derive(Debug, Parser)]
pub struct WalPush {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(help = "Path of the WAL segment file handed over by archive_command")]
    pub wal_path: PathBuf,
}

/// Archive one explicitly requested segment plus waiting backlog segments.
///
/// Exits non-zero unless the requested segment reached both stores, which is
/// the contract archive_command relies on before recycling the segment.
pub async fn handle_wal_push(args: WalPush) -> Result<()> {
    let config = load_config(&args.common)?;
    let session = build_session(&config)?;

    let pushed = session.push_wal(&args.wal_path).await?;

    info!(
        target = "walship",
        segment = %args.wal_path.display(),
        segments = pushed,
        "wal push complete"
    );
    Ok(())
}
