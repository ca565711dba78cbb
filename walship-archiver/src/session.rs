use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use walship_core::errors::Result;
use walship_core::segment::WalSegment;
use walship_core::transfer::{SegmentPresence, SegmentTransfer};

use crate::archiver_metrics::{BACKLOG_BATCHES_TOTAL, WATCH_CYCLES_TOTAL};
use crate::backlog::BacklogScanner;
use crate::transfer_group::WalTransferGroup;

const DEFAULT_BATCH_LIMIT: usize = 8;
const DEFAULT_WATCH_INTERVAL_SECONDS: u64 = 60;

/// Session-level archiving knobs.
#[derive(Debug, Clone)]
pub struct ArchiveSessionConfig {
    /// PostgreSQL WAL directory holding segments and their archive_status.
    pub wal_dir: PathBuf,
    /// Upper bound on segments driven through one transfer group.
    pub batch_limit: usize,
    /// When true, an explicitly requested segment whose object is already in
    /// the primary store is acknowledged without re-uploading.
    pub check_before_push: bool,
    /// Backlog scan period in watch mode.
    pub watch_interval_seconds: u64,
}

impl ArchiveSessionConfig {
    pub fn new(wal_dir: impl Into<PathBuf>) -> Self {
        Self {
            wal_dir: wal_dir.into(),
            batch_limit: DEFAULT_BATCH_LIMIT,
            check_before_push: false,
            watch_interval_seconds: DEFAULT_WATCH_INTERVAL_SECONDS,
        }
    }
}

/// One archiving process's view of a WAL directory and a transferer.
///
/// The session owns batching policy only. Everything about how a single
/// segment reaches the stores lives behind [`SegmentTransfer`], and per-batch
/// ordering and failure semantics live in [`WalTransferGroup`].
pub struct ArchiveSession<T: SegmentTransfer> {
    cfg: ArchiveSessionConfig,
    transferer: Arc<T>,
    scanner: BacklogScanner,
    presence: Option<Arc<dyn SegmentPresence>>,
}

impl<T: SegmentTransfer> ArchiveSession<T> {
    pub fn new(cfg: ArchiveSessionConfig, transferer: Arc<T>) -> Self {
        let scanner = BacklogScanner::new(&cfg.wal_dir);
        Self {
            cfg,
            transferer,
            scanner,
            presence: None,
        }
    }

    /// Attach the primary-store presence probe used by `check_before_push`.
    pub fn with_presence(mut self, presence: Arc<dyn SegmentPresence>) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Archive the segment the database handed us, riding along up to
    /// `batch_limit - 1` backlog segments in the same transfer group.
    ///
    /// The explicit segment is started first and the backlog follows in WAL
    /// order. Returns the number of segments transferred; an error from any
    /// transfer in the group is returned unchanged.
    pub async fn push_wal(&self, segment_path: &Path) -> Result<usize> {
        let explicit = Arc::new(WalSegment::new(segment_path, true));

        if self.cfg.check_before_push && self.already_archived(&explicit).await {
            info!(
                target = "archiver",
                segment = %explicit.name(),
                "segment already present in primary store, acknowledging without upload"
            );
            return Ok(0);
        }

        let backlog = self
            .scanner
            .scan_ready(Some(explicit.name()), self.cfg.batch_limit.saturating_sub(1))
            .await?;

        let mut group = WalTransferGroup::new(Arc::clone(&self.transferer));
        group.start(explicit);
        for segment in backlog {
            group.start(Arc::new(segment));
        }
        let started = group.len();
        group.wait().await?;

        info!(
            target = "archiver",
            wal_dir = %self.cfg.wal_dir.display(),
            segments = started,
            "wal push complete"
        );
        Ok(started)
    }

    /// Drain the entire ready backlog in batches of `batch_limit`.
    ///
    /// Every completed batch renames its bookkeeping files, so each rescan
    /// shrinks until the directory reads empty. The first batch failure
    /// aborts the drain with that batch's error.
    pub async fn push_backlog(&self) -> Result<usize> {
        let mut total = 0usize;
        loop {
            let batch = self.scanner.scan_ready(None, self.cfg.batch_limit).await?;
            if batch.is_empty() {
                break;
            }
            let count = batch.len();
            let mut group = WalTransferGroup::new(Arc::clone(&self.transferer));
            for segment in batch {
                group.start(Arc::new(segment));
            }
            group.wait().await?;
            total += count;
            counter!(BACKLOG_BATCHES_TOTAL.name).increment(1);
        }
        if total > 0 {
            info!(
                target = "archiver",
                wal_dir = %self.cfg.wal_dir.display(),
                segments = total,
                "backlog drained"
            );
        }
        Ok(total)
    }

    /// Start a background task that drains the backlog every
    /// `watch_interval_seconds` until cancelled, with a final drain on the
    /// way out.
    ///
    /// A cycle failure is logged and the watch keeps going; segments that
    /// failed stay ready and the next cycle retries them.
    pub fn start_watch(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<Result<()>> {
        tokio::spawn(async move {
            info!(
                target = "archiver",
                wal_dir = %self.cfg.wal_dir.display(),
                interval = self.cfg.watch_interval_seconds,
                "backlog watch started"
            );
            // The first tick completes immediately, so a fresh watch drains
            // whatever is already waiting before settling into the period.
            let mut ticker =
                tokio::time::interval(Duration::from_secs(self.cfg.watch_interval_seconds));
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        self.push_backlog().await?;
                        info!(target = "archiver", "backlog watch stopped after drain");
                        break;
                    }
                    _ = ticker.tick() => {
                        counter!(WATCH_CYCLES_TOTAL.name).increment(1);
                        if let Err(e) = self.push_backlog().await {
                            error!(
                                target = "archiver",
                                wal_dir = %self.cfg.wal_dir.display(),
                                error = %e,
                                "watch cycle failed"
                            );
                        }
                    }
                }
            }
            Ok(())
        })
    }

    async fn already_archived(&self, segment: &WalSegment) -> bool {
        let presence = match &self.presence {
            Some(p) => p,
            None => return false,
        };
        match presence.segment_archived(segment.name()).await {
            Ok(present) => present,
            Err(e) => {
                // A failed probe must not block archiving; re-uploading is
                // idempotent while skipping a missing segment is not.
                warn!(
                    target = "archiver",
                    segment = %segment.name(),
                    error = %e,
                    "presence check failed, continuing with upload"
                );
                false
            }
        }
    }
}
