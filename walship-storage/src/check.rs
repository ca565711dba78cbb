use walship_core::errors::Result;
use walship_core::layout::StorageLayout;

use crate::blob::store::BlobStore;

/// Read-only probe for whether a segment's object is present in the blob
/// store under its layout key. Callers use it to decide whether a segment
/// still needs archiving; the transfer protocol itself never consults it.
pub async fn wal_object_exists(
    store: &BlobStore,
    layout: &StorageLayout,
    name: &str,
) -> Result<bool> {
    store.exists(&layout.wal_object_path(name)).await
}
