use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use walship_core::errors::Result;
use walship_core::segment::{WalSegment, ARCHIVE_STATUS_DIR, READY_SUFFIX};

/// Discovers WAL segments the database has finished writing but nobody has
/// archived yet, by listing `archive_status/*.ready` bookkeeping files.
pub struct BacklogScanner {
    wal_dir: PathBuf,
}

impl BacklogScanner {
    pub fn new(wal_dir: impl Into<PathBuf>) -> Self {
        Self {
            wal_dir: wal_dir.into(),
        }
    }

    pub fn wal_dir(&self) -> &Path {
        &self.wal_dir
    }

    /// List up to `limit` ready segments in WAL order.
    ///
    /// Segment names sort lexicographically in write order, so the oldest
    /// backlog is always returned first. `exclude` drops a segment that the
    /// caller is already transferring through another path. A missing
    /// `archive_status` directory reads as an empty backlog, and an entry
    /// vanishing mid-scan (another archiver flipped it) is skipped.
    pub async fn scan_ready(&self, exclude: Option<&str>, limit: usize) -> Result<Vec<WalSegment>> {
        let status_dir = self.wal_dir.join(ARCHIVE_STATUS_DIR);
        let mut entries = match tokio::fs::read_dir(&status_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ready: Vec<(String, PathBuf)> = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match path.extension() {
                Some(ext) if ext == READY_SUFFIX => {}
                _ => continue,
            }
            let name = match path.file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => continue,
            };
            if exclude == Some(name.as_str()) {
                continue;
            }
            ready.push((name, path));
        }

        ready.sort_by(|a, b| a.0.cmp(&b.0));
        ready.truncate(limit);

        let mut segments = Vec::with_capacity(ready.len());
        for (name, path) in ready {
            match tokio::fs::try_exists(&path).await {
                Ok(true) => segments.push(WalSegment::from_ready_file(&path)?),
                Ok(false) => {
                    debug!(
                        target = "backlog",
                        segment = %name,
                        "ready entry vanished mid-scan, skipping"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!(
            target = "backlog",
            wal_dir = %self.wal_dir.display(),
            segments = segments.len(),
            "backlog scan complete"
        );
        Ok(segments)
    }
}
