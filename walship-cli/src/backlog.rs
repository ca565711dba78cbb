use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::setup::{build_session, load_config, CommonArgs};

#[derive(Debug, Parser)]
pub struct Backlog {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Drain every segment the database marked ready for archiving, then exit.
pub async fn handle_backlog(args: Backlog) -> Result<()> {
    let config = load_config(&args.common)?;
    let session = build_session(&config)?;

    let drained = session.push_backlog().await?;

    if drained == 0 {
        info!(target = "walship", "no segments waiting for archiving");
    } else {
        info!(target = "walship", segments = drained, "backlog drained");
    }
    Ok(())
}
