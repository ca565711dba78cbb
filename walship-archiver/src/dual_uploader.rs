use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use tracing::info;
use walship_core::errors::Result;
use walship_core::segment::WalSegment;
use walship_core::transfer::{SegmentTransfer, SegmentUpload};

use crate::archiver_metrics::{
    SEGMENTS_ARCHIVED_TOTAL, SEGMENT_FAILURES_TOTAL, SEGMENT_TRANSFER_SECONDS,
};

/// Drives one WAL segment through the full archive protocol: primary blob
/// upload, then mirror sync, then the archive status flip for segments this
/// process is responsible for.
///
/// The step order is fixed. The mirror upload only starts after the primary
/// upload succeeded, the status flip only happens after both uploads
/// succeeded, and explicitly requested segments are never flipped because
/// PostgreSQL tracks those itself. Whichever step fails, its error is
/// returned to the caller unchanged.
#[derive(Debug)]
pub struct WalDualUploader<B, M> {
    blob: B,
    mirror: M,
}

impl<B, M> WalDualUploader<B, M>
where
    B: SegmentUpload,
    M: SegmentUpload,
{
    pub fn new(blob: B, mirror: M) -> Self {
        Self { blob, mirror }
    }
}

#[async_trait]
impl<B, M> SegmentTransfer for WalDualUploader<B, M>
where
    B: SegmentUpload,
    M: SegmentUpload,
{
    async fn transfer(&self, segment: Arc<WalSegment>) -> Result<()> {
        let started = Instant::now();

        if let Err(e) = self.blob.upload_segment(&segment).await {
            counter!(SEGMENT_FAILURES_TOTAL.name, "stage" => "blob").increment(1);
            return Err(e);
        }
        if let Err(e) = self.mirror.upload_segment(&segment).await {
            counter!(SEGMENT_FAILURES_TOTAL.name, "stage" => "mirror").increment(1);
            return Err(e);
        }
        if !segment.is_explicit() {
            if let Err(e) = segment.mark_archived().await {
                counter!(SEGMENT_FAILURES_TOTAL.name, "stage" => "archive_status").increment(1);
                return Err(e);
            }
        }

        counter!(SEGMENTS_ARCHIVED_TOTAL.name).increment(1);
        histogram!(SEGMENT_TRANSFER_SECONDS.name).record(started.elapsed().as_secs_f64());
        info!(
            target = "archiver",
            segment = %segment.name(),
            explicit = segment.is_explicit(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "segment archived to both stores"
        );
        Ok(())
    }
}
