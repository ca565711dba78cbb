mod backlog;
mod service_configuration;
mod setup;
mod wal_check;
mod wal_push;
mod watch;

#[cfg(test)]
mod service_configuration_test;

use anyhow::Result;
use clap::{Parser, Subcommand};

use backlog::Backlog;
use wal_check::WalCheck;
use wal_push::WalPush;
use watch::Watch;

#[derive(Debug, Parser)]
#[command(name = "walship")]
#[command(about = "Ship PostgreSQL WAL segments to a blob store and a mirror store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Archive one WAL segment plus waiting backlog segments")]
    WalPush(WalPush),

    #[command(about = "Drain every segment marked ready for archiving")]
    Backlog(Backlog),

    #[command(about = "Query whether a segment was archived to the primary store")]
    WalCheck(WalCheck),

    #[command(about = "Drain the archiving backlog periodically")]
    Watch(Watch),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::WalPush(args) => wal_push::handle_wal_push(args).await?,
        Commands::Backlog(args) => backlog::handle_backlog(args).await?,
        Commands::WalCheck(args) => wal_check::handle_wal_check(args).await?,
        Commands::Watch(args) => watch::handle_watch(args).await?,
    }

    Ok(())
}
