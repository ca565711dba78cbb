// Blob store module entry: flat submodules and public re-exports

pub mod config;
pub mod store;
pub mod uploader;

pub use config::{BackendConfig, CloudBackend, LocalBackend};
pub use store::{BlobStore, BlobWriter};
pub use uploader::{BlobUploadConfig, WalBlobUploader};

// Local test modules for blob components
#[cfg(test)]
mod store_test;
