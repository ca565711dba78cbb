use opendal::Operator;
use walship_core::errors::{ArchiveError, Result};

use crate::blob::config::BackendConfig;

/// Thin wrapper over an opendal [`Operator`] with uniform key joining and
/// error mapping. All blob access in the archiver goes through this type.
#[derive(Debug, Clone)]
pub struct BlobStore {
    /// Extra prefix joined in front of every key (used by local backends)
    root_prefix: String,
    /// Opendal operator
    op: Operator,
}

impl BlobStore {
    pub fn new(cfg: &BackendConfig) -> Result<Self> {
        let (op, root_prefix) = cfg.build_operator()?;
        Ok(Self { root_prefix, op })
    }

    /// Write a whole object in one call via the streaming writer API, which
    /// allows the backend to use multipart uploads where supported.
    pub async fn put_object(&self, path: &str, bytes: &[u8]) -> Result<opendal::Metadata> {
        let key = self.join(path);
        let mut writer = self
            .op
            .writer(&key)
            .await
            .map_err(|e| ArchiveError::BlobStore(format!("blob writer {}: {}", key, e)))?;
        // Write requires owned data for the async future; pass a Buffer
        let buf = opendal::Buffer::from(bytes.to_vec());
        writer
            .write(buf)
            .await
            .map_err(|e| ArchiveError::BlobStore(format!("blob write {}: {}", key, e)))?;
        writer
            .close()
            .await
            .map_err(|e| ArchiveError::BlobStore(format!("blob close {}: {}", key, e)))
    }

    pub async fn get_object(&self, path: &str) -> Result<Vec<u8>> {
        let key = self.join(path);
        let data = self
            .op
            .read(&key)
            .await
            .map_err(|e| ArchiveError::BlobStore(format!("blob get {}: {}", key, e)))?;
        Ok(data.to_vec())
    }

    /// Probe whether an object exists. Absence is an answer, not an error;
    /// any other backend failure is propagated.
    pub async fn exists(&self, path: &str) -> Result<bool> {
        let key = self.join(path);
        match self.op.stat(&key).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ArchiveError::BlobStore(format!(
                "blob stat {}: {}",
                key, e
            ))),
        }
    }

    /// Open a streaming writer with explicit chunk size and write concurrency.
    /// Cloud backends turn this into a multipart upload.
    pub async fn open_streaming_writer(
        &self,
        path: &str,
        chunk_size: usize,
        concurrent: usize,
    ) -> Result<BlobWriter> {
        let key = self.join(path);
        let writer = self
            .op
            .writer_with(&key)
            .chunk(chunk_size)
            .concurrent(concurrent)
            .await
            .map_err(|e| ArchiveError::BlobStore(format!("blob writer_with {}: {}", key, e)))?;
        Ok(BlobWriter {
            inner: writer,
            bytes_written: 0,
        })
    }

    #[inline]
    fn join(&self, path: &str) -> String {
        let p = path.trim_matches('/');
        if self.root_prefix.is_empty() {
            p.to_string()
        } else {
            format!("{}/{}", self.root_prefix.trim_matches('/'), p)
        }
    }
}

/// Streaming blob writer wrapper.
pub struct BlobWriter {
    inner: opendal::Writer,
    bytes_written: u64,
}

impl BlobWriter {
    pub async fn write(&mut self, buf: &[u8]) -> Result<()> {
        let buffer = opendal::Buffer::from(buf.to_vec());
        self.inner
            .write(buffer)
            .await
            .map_err(|e| ArchiveError::BlobStore(format!("blob write: {}", e)))?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }

    pub async fn close(&mut self) -> Result<opendal::Metadata> {
        self.inner
            .close()
            .await
            .map_err(|e| ArchiveError::BlobStore(format!("blob close: {}", e)))
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}
