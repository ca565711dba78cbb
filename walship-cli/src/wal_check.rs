use anyhow::Result;
use clap::Parser;
use walship_storage::wal_object_exists;

use crate::setup::{build_store, load_config, CommonArgs};

#[derive(Debug, Parser)]
pub struct WalCheck {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(help = "WAL segment name, e.g. 000000010000000000000042")]
    pub segment_name: String,
}

/// Report whether a segment's object is present in the primary store.
///
/// Exit status 0 means archived, 1 means not found. Mirror contents are not
/// consulted.
pub async fn handle_wal_check(args: WalCheck) -> Result<()> {
    let config = load_config(&args.common)?;
    let (store, layout) = build_store(&config)?;

    let key = layout.wal_object_path(&args.segment_name);
    if wal_object_exists(&store, &layout, &args.segment_name).await? {
        println!("{} archived as {}", args.segment_name, key);
        Ok(())
    } else {
        println!("{} not archived (checked {})", args.segment_name, key);
        std::process::exit(1);
    }
}
