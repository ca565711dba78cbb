use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors raised while archiving WAL segments.
///
/// Transfer tasks return these verbatim: the transfer group captures the first
/// failure it observes and re-raises it without inspecting or classifying it,
/// so the variant a caller sees is exactly what the failing step produced.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blob store error: {0}")]
    BlobStore(String),

    #[error("mirror store error: {0}")]
    Mirror(String),

    #[error("mirror utility {utility} exited with status {code}")]
    MirrorStatus { utility: String, code: i32 },

    #[error("archive status update failed: {0}")]
    ArchiveStatus(String),

    #[error("invalid segment state: {0}")]
    InvalidState(String),

    #[error("transfer task failed: {0}")]
    TaskFailure(String),

    #[error("{0}")]
    Other(String),
}
