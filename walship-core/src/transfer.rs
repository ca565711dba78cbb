use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;
use crate::segment::WalSegment;

/// One upload destination for WAL segments.
///
/// Both stores an archiving run writes to expose this same shape.
/// Implementations must tolerate concurrent invocation from many transfer
/// tasks; the coordinator does not serialize calls.
#[async_trait]
pub trait SegmentUpload: Send + Sync + 'static {
    async fn upload_segment(&self, segment: &WalSegment) -> Result<()>;
}

/// The complete per-segment transfer protocol a transfer group drives to a
/// terminal outcome.
///
/// Kept separate from [`SegmentUpload`] so the group stays independent of how
/// many destinations a transferer writes to, or whether it uploads at all.
#[async_trait]
pub trait SegmentTransfer: Send + Sync + 'static {
    async fn transfer(&self, segment: Arc<WalSegment>) -> Result<()>;
}

/// Read-only answer to whether a segment's archived object already exists in
/// the primary store.
///
/// Sessions use this to recognize a segment the database re-requests after a
/// completed upload whose acknowledgement was lost. It is a query, not part
/// of the transfer protocol.
#[async_trait]
pub trait SegmentPresence: Send + Sync + 'static {
    async fn segment_archived(&self, name: &str) -> Result<bool>;
}
