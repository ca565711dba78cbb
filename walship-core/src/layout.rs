/// Storage layout version, part of every derived key. Bumped when the
/// destination addressing scheme changes so older archives stay addressable.
pub const LAYOUT_VERSION: &str = "001";

/// Derives destination keys for archived WAL objects under a configured root
/// prefix.
///
/// The same derivation answers both sides of the archiving contract: the blob
/// uploader writes a segment to `wal_object_path(name)`, and the existence
/// check stats that key to decide whether a segment needs re-archiving.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    prefix: String,
}

impl StorageLayout {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key of the archived object for a WAL segment name, e.g.
    /// `archive/wal_001/000000010000000000000042`.
    ///
    /// Segments are stored verbatim, so the key carries no encoding suffix.
    pub fn wal_object_path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            format!("wal_{}/{}", LAYOUT_VERSION, name)
        } else {
            format!("{}/wal_{}/{}", self.prefix, LAYOUT_VERSION, name)
        }
    }
}
