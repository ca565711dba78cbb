// Centralized metric name constants for the storage crate (blob + mirror)
// Mirrors the style of walship-archiver/src/archiver_metrics.rs without cross-crate deps.

#[derive(Debug, Clone, Copy)]
pub struct Metric {
    pub name: &'static str,
    #[allow(dead_code)]
    pub description: &'static str,
}

pub const BLOB_UPLOAD_OBJECTS_TOTAL: Metric = Metric {
    name: "walship_blob_upload_objects_total",
    description: "Total number of WAL objects uploaded to the primary store (result={ok,error})",
};

pub const BLOB_UPLOAD_BYTES_TOTAL: Metric = Metric {
    name: "walship_blob_upload_bytes_total",
    description: "Total bytes uploaded to the primary store",
};

pub const MIRROR_INVOCATIONS_TOTAL: Metric = Metric {
    name: "walship_mirror_invocations_total",
    description: "Total number of mirror sync utility invocations (result={ok,error})",
};

#[allow(dead_code)]
pub const COUNTERS: &[Metric] = &[
    BLOB_UPLOAD_OBJECTS_TOTAL,
    BLOB_UPLOAD_BYTES_TOTAL,
    MIRROR_INVOCATIONS_TOTAL,
];
