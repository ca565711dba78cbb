// Blob store module entry (primary archive destination)
pub mod blob;
pub use blob::{
    BackendConfig, BlobStore, BlobUploadConfig, BlobWriter, CloudBackend, LocalBackend,
    WalBlobUploader,
};

// External mirror sync client (secondary archive destination)
pub mod mirror;
pub use mirror::{MirrorConfig, WalMirrorUploader};

// Archived-object existence probe
pub mod check;
pub use check::wal_object_exists;

mod storage_metrics;
