use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::errors::{ArchiveError, Result};

/// Directory under the WAL directory where the database keeps archiver
/// bookkeeping (`<name>.ready` / `<name>.done` files).
pub const ARCHIVE_STATUS_DIR: &str = "archive_status";

/// Extension of a bookkeeping file announcing a segment awaiting archiving.
pub const READY_SUFFIX: &str = "ready";

/// Extension of a bookkeeping file recording a segment as archived.
pub const DONE_SUFFIX: &str = "done";

/// One WAL file scheduled for transfer.
///
/// `explicit` records how the segment entered the tool: true when the database
/// process invoked archiving for exactly this file and reads the tool's exit
/// status as the completion signal, false for segments discovered by backlog
/// scanning, whose only completion record is the archival mark.
#[derive(Debug)]
pub struct WalSegment {
    // Filesystem location of the segment file
    path: PathBuf,
    // Logical name used for destination addressing, the final path component
    name: String,
    // True iff archiving was requested directly by the database process
    explicit: bool,
    // Flipped at most once by mark_archived; never set on explicit segments
    archived: AtomicBool,
}

impl WalSegment {
    /// Create a segment for the WAL file at `path`.
    ///
    /// The path is not checked for existence here; a missing file surfaces
    /// through the upload capabilities when the transfer runs.
    pub fn new(path: impl Into<PathBuf>, explicit: bool) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            explicit,
            archived: AtomicBool::new(false),
        }
    }

    /// Reconstruct a non-explicit segment from its `archive_status/<name>.ready`
    /// bookkeeping file, as produced by the backlog scan.
    pub fn from_ready_file(ready_path: &Path) -> Result<Self> {
        let name = match ready_path.extension() {
            Some(ext) if ext == READY_SUFFIX => ready_path
                .file_stem()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            _ => {
                return Err(ArchiveError::InvalidState(format!(
                    "not an archive_status ready file: {}",
                    ready_path.display()
                )))
            }
        };
        // archive_status lives one level below the WAL directory
        let wal_dir = ready_path
            .parent()
            .and_then(|status_dir| status_dir.parent())
            .unwrap_or_else(|| Path::new(""));
        Ok(Self::new(wal_dir.join(name), false))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn is_archived(&self) -> bool {
        self.archived.load(Ordering::Acquire)
    }

    /// The `.ready` bookkeeping file announcing this segment for archiving.
    pub fn ready_path(&self) -> PathBuf {
        self.status_path(READY_SUFFIX)
    }

    /// The `.done` bookkeeping file recording this segment as archived.
    pub fn done_path(&self) -> PathBuf {
        self.status_path(DONE_SUFFIX)
    }

    fn status_path(&self, suffix: &str) -> PathBuf {
        self.path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(ARCHIVE_STATUS_DIR)
            .join(format!("{}.{}", self.name, suffix))
    }

    /// Record this segment as archived by renaming its `.ready` bookkeeping
    /// file to `.done`.
    ///
    /// Only valid for non-explicit segments, and only once. Explicit segments
    /// signal completion through the process exit status; renaming their
    /// bookkeeping here would be redundant and could race with the same
    /// segment being re-archived through the backlog path.
    pub async fn mark_archived(&self) -> Result<()> {
        if self.explicit {
            return Err(ArchiveError::InvalidState(format!(
                "segment {} was passed explicitly by the database; its archive status is not ours to manage",
                self.name
            )));
        }

        // Claim the mark before touching the filesystem so a concurrent second
        // call fails instead of racing the rename.
        if self
            .archived
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ArchiveError::InvalidState(format!(
                "segment {} already marked archived",
                self.name
            )));
        }

        let ready = self.ready_path();
        let done = self.done_path();
        if let Err(e) = tokio::fs::rename(&ready, &done).await {
            // The bookkeeping was not updated; release the claim so the
            // segment still reads as unarchived.
            self.archived.store(false, Ordering::Release);
            return Err(ArchiveError::ArchiveStatus(format!(
                "rename {} -> {}: {}",
                ready.display(),
                done.display(),
                e
            )));
        }

        debug!(target = "segment", segment = %self.name, "archive status marked done");
        Ok(())
    }
}

impl Display for WalSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
