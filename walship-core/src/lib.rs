pub mod errors;
pub use errors::ArchiveError;

pub mod segment;
pub use segment::WalSegment;

pub mod layout;
pub use layout::{StorageLayout, LAYOUT_VERSION};

pub mod transfer;
pub use transfer::{SegmentPresence, SegmentTransfer, SegmentUpload};
