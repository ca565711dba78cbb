use std::collections::HashMap;

use opendal::services::{Fs, Gcs, Memory, S3};
use opendal::Operator;
use tracing::warn;
use walship_core::errors::{ArchiveError, Result};

/// Cloud backends hosted out of process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudBackend {
    S3,
    Gcs,
}

/// Local backends, useful for single-host deployments and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalBackend {
    Fs,
    Memory,
}

/// Declarative blob store selection, resolved to an opendal [`Operator`]
/// by [`BackendConfig::build_operator`].
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Cloud {
        backend: CloudBackend,
        /// A URI-like root, e.g. s3://bucket/prefix, gcs://bucket/prefix
        root: String,
        /// Backend-specific options (endpoint, region, credentials, etc.)
        options: HashMap<String, String>,
    },
    Local {
        backend: LocalBackend,
        /// For fs: an absolute directory like file:///var/lib/walship or /var/lib/walship.
        /// For memory: a logical namespace used as a virtual root.
        root: String,
    },
}

impl BackendConfig {
    /// Build the opendal operator for this backend.
    ///
    /// Returns the operator together with an extra key prefix that the store
    /// must join in front of every object path. Cloud backends encode their
    /// prefix in the operator root, so the extra prefix is empty for them.
    pub fn build_operator(&self) -> Result<(Operator, String)> {
        match self {
            BackendConfig::Cloud {
                backend,
                root,
                options,
            } => match backend {
                CloudBackend::S3 => build_s3(root, options),
                CloudBackend::Gcs => build_gcs(root, options),
            },
            BackendConfig::Local { backend, root } => match backend {
                LocalBackend::Fs => build_fs(root),
                LocalBackend::Memory => build_memory(root),
            },
        }
    }
}

fn build_s3(root: &str, options: &HashMap<String, String>) -> Result<(Operator, String)> {
    let (bucket, prefix) = split_bucket_prefix(root)?;
    warn_unknown_options(
        "s3",
        options,
        &["endpoint", "region", "access_key", "secret_key"],
    );
    // Builders in opendal 0.54 consume self: use chaining/reassignment
    let mut builder = S3::default();
    builder = builder.bucket(&bucket);
    if !prefix.is_empty() {
        // S3 root must be an absolute path
        builder = builder.root(&format!("/{}", prefix));
    }
    if let Some(endpoint) = options.get("endpoint") {
        builder = builder.endpoint(endpoint);
    }
    if let Some(region) = options.get("region") {
        builder = builder.region(region);
    }
    if let Some(ak) = options.get("access_key") {
        builder = builder.access_key_id(ak);
    }
    if let Some(sk) = options.get("secret_key") {
        builder = builder.secret_access_key(sk);
    }
    let op = Operator::new(builder)
        .map_err(|e| ArchiveError::BlobStore(format!("opendal s3 builder: {}", e)))?
        .finish();
    Ok((op, String::new()))
}

fn build_gcs(root: &str, options: &HashMap<String, String>) -> Result<(Operator, String)> {
    let (bucket, prefix) = split_bucket_prefix(root)?;
    warn_unknown_options("gcs", options, &["endpoint", "credential_file"]);
    let mut builder = Gcs::default();
    builder = builder.bucket(&bucket);
    if !prefix.is_empty() {
        builder = builder.root(&format!("/{}", prefix));
    }
    if let Some(cred_file) = options.get("credential_file") {
        builder = builder.credential_path(cred_file);
    }
    if let Some(endpoint) = options.get("endpoint") {
        builder = builder.endpoint(endpoint);
    }
    let op = Operator::new(builder)
        .map_err(|e| ArchiveError::BlobStore(format!("opendal gcs builder: {}", e)))?
        .finish();
    Ok((op, String::new()))
}

fn build_fs(root: &str) -> Result<(Operator, String)> {
    // Accept either file:///abs/path or /abs/path
    let fs_root = root.strip_prefix("file://").unwrap_or(root);
    let builder = Fs::default().root(fs_root);
    let op = Operator::new(builder)
        .map_err(|e| ArchiveError::BlobStore(format!("opendal fs builder: {}", e)))?
        .finish();
    Ok((op, String::new()))
}

fn build_memory(root: &str) -> Result<(Operator, String)> {
    // Memory service has no real root; keep the configured one as a logical prefix
    let builder = Memory::default();
    let op = Operator::new(builder)
        .map_err(|e| ArchiveError::BlobStore(format!("opendal memory builder: {}", e)))?
        .finish();
    Ok((op, normalize_prefix(root)))
}

fn warn_unknown_options(service: &str, options: &HashMap<String, String>, allowed: &[&str]) {
    for k in options.keys() {
        if !allowed.contains(&k.as_str()) {
            warn!(
                target = "blob_store",
                "unknown {} option '{}'; accepted keys: {:?}",
                service,
                k,
                allowed
            );
        }
    }
}

/// Split a `scheme://bucket/prefix` URI into bucket and normalized prefix.
/// A bare string without a scheme is treated as a bucket name.
pub(crate) fn split_bucket_prefix(uri: &str) -> Result<(String, String)> {
    match uri.split_once("://") {
        Some((_scheme, rest)) => {
            let (bucket, prefix) = match rest.split_once('/') {
                Some((b, p)) => (b, p),
                None => (rest, ""),
            };
            if bucket.is_empty() {
                return Err(ArchiveError::BlobStore(format!(
                    "invalid store uri, missing bucket: {}",
                    uri
                )));
            }
            Ok((bucket.to_string(), normalize_prefix(prefix)))
        }
        None => Ok((uri.to_string(), String::new())),
    }
}

pub(crate) fn normalize_prefix(p: &str) -> String {
    p.trim_matches('/').to_string()
}
