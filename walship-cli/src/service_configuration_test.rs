#[cfg(test)]
mod tests {
    use crate::service_configuration::{LoadConfiguration, ServiceConfiguration, StoreConfig};
    use std::path::PathBuf;
    use walship_storage::{BackendConfig, CloudBackend, LocalBackend};

    fn parse(yaml: &str) -> ServiceConfiguration {
        let load_config: LoadConfiguration = serde_yaml::from_str(yaml).expect("parse yaml");
        load_config.try_into().expect("convert configuration")
    }

    /// Test: Full configuration file round trip
    ///
    /// Purpose
    /// - Validate that every configurable knob survives YAML loading and
    ///   conversion into the runtime configuration
    ///
    /// Flow
    /// - Parse a config file exercising s3 backend, upload tuning, mirror
    ///   overrides and the prometheus exporter
    /// - Convert into ServiceConfiguration
    ///
    /// Expected
    /// - Every field lands where the archiving components read it
    #[test]
    fn test_full_configuration() {
        let yaml = r#"
cluster_name: pg-main
archive:
  wal_dir: /var/lib/postgresql/16/main/pg_wal
  prefix: prod-wal
  batch_limit: 16
  check_before_push: true
  watch_interval_seconds: 30
primary:
  backend: s3
  root: s3://wal-archive/pg-main
  region: eu-central-1
  endpoint: http://127.0.0.1:9000
  access_key: walship
  secret_key: secret
upload:
  chunk_size_mb: 16
  concurrent: 8
mirror:
  utility: /usr/local/bin/gluster-sync
  subcommand: volume-push
  timeout_seconds: 120
prom_exporter: 127.0.0.1:9040
"#;
        let config = parse(yaml);

        assert_eq!(config.cluster_name, "pg-main");
        assert_eq!(
            config.session.wal_dir,
            PathBuf::from("/var/lib/postgresql/16/main/pg_wal")
        );
        assert_eq!(config.session.batch_limit, 16);
        assert!(config.session.check_before_push);
        assert_eq!(config.session.watch_interval_seconds, 30);

        assert_eq!(
            config.layout.wal_object_path("000000010000000000000001"),
            "prod-wal/wal_001/000000010000000000000001"
        );

        match &config.primary {
            BackendConfig::Cloud {
                backend,
                root,
                options,
            } => {
                assert_eq!(*backend, CloudBackend::S3);
                assert_eq!(root, "s3://wal-archive/pg-main");
                assert_eq!(options.get("region").map(String::as_str), Some("eu-central-1"));
                assert_eq!(
                    options.get("endpoint").map(String::as_str),
                    Some("http://127.0.0.1:9000")
                );
                assert_eq!(options.get("access_key").map(String::as_str), Some("walship"));
                assert_eq!(options.get("secret_key").map(String::as_str), Some("secret"));
            }
            other => panic!("expected cloud backend, got {:?}", other),
        }

        assert_eq!(config.blob_upload.chunk_size, 16 * 1024 * 1024);
        assert_eq!(config.blob_upload.concurrent, 8);

        assert_eq!(config.mirror.utility, PathBuf::from("/usr/local/bin/gluster-sync"));
        assert_eq!(config.mirror.subcommand, "volume-push");
        assert_eq!(config.mirror.timeout_seconds, Some(120));

        assert_eq!(
            config.prom_exporter,
            Some("127.0.0.1:9040".parse().expect("socket addr"))
        );
    }

    /// Test: Minimal configuration applies defaults
    ///
    /// Purpose
    /// - Validate defaults when the config file only names the essentials
    ///
    /// Expected
    /// - Object prefix falls back to the cluster name
    /// - Batching, watch interval, upload tuning and mirror subcommand use
    ///   their built-in defaults
    #[test]
    fn test_minimal_configuration_defaults() {
        let yaml = r#"
cluster_name: pg-standby
archive:
  wal_dir: /pg/wal
primary:
  backend: memory
  root: wal-archive
mirror:
  utility: /usr/bin/mirror-sync
"#;
        let config = parse(yaml);

        assert_eq!(config.session.wal_dir, PathBuf::from("/pg/wal"));
        assert_eq!(config.session.batch_limit, 8);
        assert!(!config.session.check_before_push);
        assert_eq!(config.session.watch_interval_seconds, 60);

        // Prefix defaults to the cluster name
        assert_eq!(
            config.layout.wal_object_path("000000010000000000000001"),
            "pg-standby/wal_001/000000010000000000000001"
        );

        assert_eq!(config.blob_upload.chunk_size, 8 * 1024 * 1024);
        assert_eq!(config.blob_upload.concurrent, 4);

        assert_eq!(config.mirror.subcommand, "wal-push");
        assert_eq!(config.mirror.timeout_seconds, None);

        assert_eq!(config.prom_exporter, None);
    }

    #[test]
    fn test_local_backends_map_to_local_config() {
        let memory = StoreConfig::Memory {
            root: "wal".to_string(),
        };
        match BackendConfig::from(&memory) {
            BackendConfig::Local { backend, root } => {
                assert_eq!(backend, LocalBackend::Memory);
                assert_eq!(root, "wal");
            }
            other => panic!("expected local backend, got {:?}", other),
        }

        let fs = StoreConfig::Fs {
            root: "/tmp/wal".to_string(),
        };
        match BackendConfig::from(&fs) {
            BackendConfig::Local { backend, root } => {
                assert_eq!(backend, LocalBackend::Fs);
                assert_eq!(root, "/tmp/wal");
            }
            other => panic!("expected local backend, got {:?}", other),
        }
    }

    /// Test: Invalid prometheus address is rejected at conversion time
    #[test]
    fn test_invalid_prom_exporter_rejected() {
        let yaml = r#"
cluster_name: pg-main
archive:
  wal_dir: /pg/wal
primary:
  backend: memory
  root: wal-archive
mirror:
  utility: /usr/bin/mirror-sync
prom_exporter: not-an-address
"#;
        let load_config: LoadConfiguration = serde_yaml::from_str(yaml).expect("parse yaml");
        let converted: Result<ServiceConfiguration, _> = load_config.try_into();
        assert!(converted.is_err());
    }

    /// Test: Unknown backend tag fails YAML parsing
    #[test]
    fn test_unknown_backend_rejected() {
        let yaml = r#"
cluster_name: pg-main
archive:
  wal_dir: /pg/wal
primary:
  backend: tape
  root: wal-archive
mirror:
  utility: /usr/bin/mirror-sync
"#;
        let parsed: Result<LoadConfiguration, _> = serde_yaml::from_str(yaml);
        assert!(parsed.is_err());
    }
}
