// Per-segment archive protocol (primary, then mirror, then status flip)
pub mod dual_uploader;
pub use dual_uploader::WalDualUploader;

// Concurrent batch coordination with first-failure reporting
pub mod transfer_group;
pub use transfer_group::WalTransferGroup;

// archive_status backlog discovery
pub mod backlog;
pub use backlog::BacklogScanner;

// Batching policy over a WAL directory (push, drain, watch)
pub mod session;
pub use session::{ArchiveSession, ArchiveSessionConfig};

mod archiver_metrics;
pub use archiver_metrics::init_metrics;
