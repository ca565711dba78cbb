use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};
use walship_core::errors::{ArchiveError, Result};
use walship_core::segment::WalSegment;
use walship_core::transfer::SegmentTransfer;

/// Coordinates a batch of concurrent segment transfers.
///
/// Each [`start`](WalTransferGroup::start) spawns one transfer task and
/// returns without waiting on it. [`wait`](WalTransferGroup::wait) consumes
/// the group and examines the retained handles in start order, so starting
/// after the group began draining is rejected at compile time rather than at
/// runtime.
///
/// The group never cancels anything. When `wait` surfaces a failure it drops
/// the unexamined handles, which detaches those tasks; in-flight transfers
/// run to completion in the background. The same applies when a group is
/// dropped without being waited on.
pub struct WalTransferGroup<T: SegmentTransfer> {
    transferer: Arc<T>,
    tasks: Vec<(String, JoinHandle<Result<()>>)>,
}

impl<T: SegmentTransfer> WalTransferGroup<T> {
    pub fn new(transferer: Arc<T>) -> Self {
        Self {
            transferer,
            tasks: Vec::new(),
        }
    }

    /// Spawn the transfer task for one segment and retain its handle.
    pub fn start(&mut self, segment: Arc<WalSegment>) {
        let transferer = Arc::clone(&self.transferer);
        let name = segment.name().to_string();
        debug!(target = "transfer", segment = %name, "transfer task started");
        let handle = tokio::spawn(async move { transferer.transfer(segment).await });
        self.tasks.push((name, handle));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Block until every started transfer finished, or until the first
    /// failure in start order.
    ///
    /// Handles are examined strictly in the order their transfers were
    /// started. The first failure observed is returned immediately and
    /// unchanged; transfers behind it are left running detached. A task that
    /// panicked surfaces as [`ArchiveError::TaskFailure`].
    pub async fn wait(self) -> Result<()> {
        let total = self.tasks.len();
        for (name, handle) in self.tasks {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(
                        target = "transfer",
                        segment = %name,
                        error = %e,
                        "transfer failed; unexamined transfers keep running"
                    );
                    return Err(e);
                }
                Err(join_err) => {
                    warn!(
                        target = "transfer",
                        segment = %name,
                        error = %join_err,
                        "transfer task aborted"
                    );
                    return Err(ArchiveError::TaskFailure(join_err.to_string()));
                }
            }
        }
        debug!(target = "transfer", segments = total, "all transfers complete");
        Ok(())
    }
}
