#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::blob::config::split_bucket_prefix;
    use crate::{BackendConfig, BlobStore, CloudBackend, LocalBackend};

    fn memory_store(prefix: &str) -> BlobStore {
        BlobStore::new(&BackendConfig::Local {
            backend: LocalBackend::Memory,
            root: prefix.to_string(),
        })
        .expect("create memory store")
    }

    /// Test: Memory backend put/get round trip
    ///
    /// Purpose
    /// - Validate basic object storage and retrieval through the store wrapper
    ///
    /// Flow
    /// - Create BlobStore with memory backend and a logical prefix
    /// - Put bytes at a key, read them back
    ///
    /// Expected
    /// - Retrieved bytes match what was written
    #[tokio::test]
    async fn test_memory_backend_put_get() {
        let store = memory_store("test-prefix");

        let data = b"hello walship";
        store.put_object("wal/seg.bin", data).await.expect("put object");

        let retrieved = store.get_object("wal/seg.bin").await.expect("get object");
        assert_eq!(retrieved, data);
    }

    #[tokio::test]
    async fn test_exists_reports_presence_and_absence() {
        let store = memory_store("exists-test");

        assert!(!store.exists("wal/missing").await.expect("exists probe"));

        store.put_object("wal/present", b"x").await.expect("put object");
        assert!(store.exists("wal/present").await.expect("exists probe"));
    }

    #[tokio::test]
    async fn test_filesystem_backend_round_trip() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let store = BlobStore::new(&BackendConfig::Local {
            backend: LocalBackend::Fs,
            root: tmp.path().to_string_lossy().to_string(),
        })
        .expect("create fs store");

        let data = b"filesystem data";
        store.put_object("fs-test/object.bin", data).await.expect("put object");
        let retrieved = store
            .get_object("fs-test/object.bin")
            .await
            .expect("get object");
        assert_eq!(retrieved, data);
    }

    /// Test: Streaming writer accumulates chunks into one object
    ///
    /// Purpose
    /// - Validate the chunked writer path callers use for large segments
    ///
    /// Flow
    /// - Open a streaming writer, write three chunks, close
    /// - Read the key back as a whole object
    ///
    /// Expected
    /// - Object content is the chunk concatenation and bytes_written tracks it
    #[tokio::test]
    async fn test_streaming_writer_round_trip() {
        let store = memory_store("stream-test");

        let mut writer = store
            .open_streaming_writer("wal/streamed", 1024, 2)
            .await
            .expect("open writer");
        writer.write(b"first-").await.expect("write chunk");
        writer.write(b"second-").await.expect("write chunk");
        writer.write(b"third").await.expect("write chunk");
        assert_eq!(writer.bytes_written(), 18);
        writer.close().await.expect("close writer");

        let retrieved = store.get_object("wal/streamed").await.expect("get object");
        assert_eq!(retrieved, b"first-second-third");
    }

    #[tokio::test]
    async fn test_prefix_applies_to_leading_slash_keys() {
        let store = memory_store("root-prefix");

        let data = b"path joining";
        for path in ["simple.bin", "/leading-slash.bin", "nested/path/file.bin"] {
            store.put_object(path, data).await.expect("put object");
            let retrieved = store.get_object(path).await.expect("get object");
            assert_eq!(retrieved, data, "failed for path: {}", path);
        }
    }

    #[tokio::test]
    async fn test_get_nonexistent_object_fails() {
        let store = memory_store("missing");
        assert!(store.get_object("nonexistent/object.bin").await.is_err());
    }

    // Cloud builders only validate configuration here; no network involved.
    #[tokio::test]
    async fn test_s3_backend_config_accepted() {
        let mut options = HashMap::new();
        options.insert("endpoint".to_string(), "http://localhost:9000".to_string());
        options.insert("region".to_string(), "us-east-1".to_string());
        options.insert("access_key".to_string(), "minioadmin".to_string());
        options.insert("secret_key".to_string(), "minioadmin".to_string());

        let result = BlobStore::new(&BackendConfig::Cloud {
            backend: CloudBackend::S3,
            root: "s3://wal-archive/cluster-a".to_string(),
            options,
        });
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_gcs_backend_config_accepted() {
        let mut options = HashMap::new();
        options.insert("endpoint".to_string(), "http://localhost:4443".to_string());

        let result = BlobStore::new(&BackendConfig::Cloud {
            backend: CloudBackend::Gcs,
            root: "gcs://wal-archive/cluster-a".to_string(),
            options,
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_split_bucket_prefix_with_prefix() {
        let (bucket, prefix) = split_bucket_prefix("s3://my-bucket/some/prefix").unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(prefix, "some/prefix");
    }

    #[test]
    fn test_split_bucket_prefix_bucket_only() {
        let (bucket, prefix) = split_bucket_prefix("s3://my-bucket").unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(prefix, "");
    }

    #[test]
    fn test_split_bucket_prefix_no_scheme() {
        let (bucket, prefix) = split_bucket_prefix("just-a-bucket").unwrap();
        assert_eq!(bucket, "just-a-bucket");
        assert_eq!(prefix, "");
    }

    #[test]
    fn test_split_bucket_prefix_missing_bucket() {
        assert!(split_bucket_prefix("s3:///prefix").is_err());
    }
}
