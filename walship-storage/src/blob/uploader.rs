use async_trait::async_trait;
use metrics::counter;
use tokio::io::AsyncReadExt;
use tracing::debug;
use walship_core::errors::{ArchiveError, Result};
use walship_core::layout::StorageLayout;
use walship_core::segment::WalSegment;
use walship_core::transfer::{SegmentPresence, SegmentUpload};

use crate::blob::store::BlobStore;
use crate::check::wal_object_exists;
use crate::storage_metrics::{BLOB_UPLOAD_BYTES_TOTAL, BLOB_UPLOAD_OBJECTS_TOTAL};

/// Streaming knobs for segment uploads.
#[derive(Debug, Clone)]
pub struct BlobUploadConfig {
    /// Part size handed to the backend writer; cloud multipart uploads require
    /// at least 5 MiB per part.
    pub chunk_size: usize,
    /// Number of parts the writer may upload in flight.
    pub concurrent: usize,
}

impl Default for BlobUploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8 * 1024 * 1024,
            concurrent: 4,
        }
    }
}

/// Primary upload capability: copies a WAL segment file into the blob store
/// under the versioned layout key for its name.
#[derive(Debug, Clone)]
pub struct WalBlobUploader {
    store: BlobStore,
    layout: StorageLayout,
    cfg: BlobUploadConfig,
}

impl WalBlobUploader {
    pub fn new(store: BlobStore, layout: StorageLayout, cfg: BlobUploadConfig) -> Self {
        Self { store, layout, cfg }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    async fn stream_segment(
        &self,
        segment: &WalSegment,
        key: &str,
    ) -> Result<(u64, opendal::Metadata)> {
        let mut file = tokio::fs::File::open(segment.path()).await.map_err(|e| {
            ArchiveError::BlobStore(format!("open segment {}: {}", segment.path().display(), e))
        })?;

        let mut writer = self
            .store
            .open_streaming_writer(key, self.cfg.chunk_size, self.cfg.concurrent)
            .await?;
        let mut buf = vec![0u8; self.cfg.chunk_size];
        loop {
            let n = file.read(&mut buf).await.map_err(|e| {
                ArchiveError::BlobStore(format!(
                    "read segment {}: {}",
                    segment.path().display(),
                    e
                ))
            })?;
            if n == 0 {
                break;
            }
            writer.write(&buf[..n]).await?;
        }
        let bytes = writer.bytes_written();
        let meta = writer.close().await?;
        Ok((bytes, meta))
    }
}

#[async_trait]
impl SegmentUpload for WalBlobUploader {
    async fn upload_segment(&self, segment: &WalSegment) -> Result<()> {
        let key = self.layout.wal_object_path(segment.name());
        match self.stream_segment(segment, &key).await {
            Ok((bytes, meta)) => {
                counter!(BLOB_UPLOAD_OBJECTS_TOTAL.name, "result" => "ok").increment(1);
                counter!(BLOB_UPLOAD_BYTES_TOTAL.name).increment(bytes);
                debug!(
                    target = "blob",
                    segment = %segment.name(),
                    key = %key,
                    bytes = bytes,
                    etag = ?meta.etag(),
                    "segment uploaded to blob store"
                );
                Ok(())
            }
            Err(e) => {
                counter!(BLOB_UPLOAD_OBJECTS_TOTAL.name, "result" => "error").increment(1);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl SegmentPresence for WalBlobUploader {
    async fn segment_archived(&self, name: &str) -> Result<bool> {
        wal_object_exists(&self.store, &self.layout, name).await
    }
}
