use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use tokio::process::Command;
use tracing::{debug, warn};
use walship_core::errors::{ArchiveError, Result};
use walship_core::segment::WalSegment;
use walship_core::transfer::SegmentUpload;

use crate::storage_metrics::MIRROR_INVOCATIONS_TOTAL;

/// Invocation settings for the external mirror sync utility.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Path of the utility binary that syncs a file into the mirror store.
    pub utility: PathBuf,
    /// Subcommand passed before the segment path.
    pub subcommand: String,
    /// Optional per-invocation timeout. The transfer layer imposes none of
    /// its own, so a hung utility without this knob hangs the transfer.
    pub timeout_seconds: Option<u64>,
}

impl MirrorConfig {
    pub fn new(utility: impl Into<PathBuf>) -> Self {
        Self {
            utility: utility.into(),
            subcommand: "wal-push".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Secondary upload capability: hands the segment file to an external
/// utility that replicates it into the mirror store.
///
/// The utility is invoked as `<utility> <subcommand> <segment path>` and its
/// exit status is the only success signal; any non-zero status fails the
/// segment's transfer.
#[derive(Debug, Clone)]
pub struct WalMirrorUploader {
    cfg: MirrorConfig,
}

impl WalMirrorUploader {
    pub fn new(cfg: MirrorConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl SegmentUpload for WalMirrorUploader {
    async fn upload_segment(&self, segment: &WalSegment) -> Result<()> {
        let utility = self.cfg.utility.display().to_string();

        let mut command = Command::new(&self.cfg.utility);
        command
            .arg(&self.cfg.subcommand)
            .arg(segment.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Reap the child if the timeout below drops the wait future
            .kill_on_drop(true);

        let run = command.output();
        let output = match self.cfg.timeout_seconds {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), run)
                .await
                .map_err(|_| {
                    ArchiveError::Mirror(format!(
                        "{} {} {} timed out after {}s",
                        utility,
                        self.cfg.subcommand,
                        segment.name(),
                        secs
                    ))
                })?,
            None => run.await,
        }
        .map_err(|e| ArchiveError::Mirror(format!("spawn {}: {}", utility, e)))?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                target = "mirror",
                segment = %segment.name(),
                utility = %utility,
                code = code,
                stderr = %stderr.trim(),
                "mirror utility failed"
            );
            counter!(MIRROR_INVOCATIONS_TOTAL.name, "result" => "error").increment(1);
            return Err(ArchiveError::MirrorStatus { utility, code });
        }

        counter!(MIRROR_INVOCATIONS_TOTAL.name, "result" => "ok").increment(1);
        debug!(
            target = "mirror",
            segment = %segment.name(),
            utility = %utility,
            "segment synced to mirror store"
        );
        Ok(())
    }
}
