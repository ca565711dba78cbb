use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

pub(crate) struct Metric {
    pub name: &'static str,
    description: &'static str,
}

pub(crate) const COUNTERS: [Metric; 4] = [
    SEGMENTS_ARCHIVED_TOTAL,
    SEGMENT_FAILURES_TOTAL,
    BACKLOG_BATCHES_TOTAL,
    WATCH_CYCLES_TOTAL,
];
pub(crate) const HISTOGRAMS: [Metric; 1] = [SEGMENT_TRANSFER_SECONDS];

// TRANSFER Metrics --------------------------

pub(crate) const SEGMENTS_ARCHIVED_TOTAL: Metric = Metric {
    name: "walship_segments_archived_total",
    description: "Total WAL segments that completed the full archive protocol (both stores)",
};

pub(crate) const SEGMENT_FAILURES_TOTAL: Metric = Metric {
    name: "walship_segment_failures_total",
    description: "Total failed segment transfers, labeled by the stage that failed",
};

pub(crate) const SEGMENT_TRANSFER_SECONDS: Metric = Metric {
    name: "walship_segment_transfer_seconds",
    description: "End-to-end duration of one segment's archive protocol in seconds",
};

// SESSION Metrics --------------------------

pub(crate) const BACKLOG_BATCHES_TOTAL: Metric = Metric {
    name: "walship_backlog_batches_total",
    description: "Total backlog batches driven to completion",
};

pub(crate) const WATCH_CYCLES_TOTAL: Metric = Metric {
    name: "walship_watch_cycles_total",
    description: "Total watch cycles executed (including cycles that found no backlog)",
};

pub fn init_metrics(prom_addr: Option<std::net::SocketAddr>, cluster_name: String) {
    info!("initializing metrics exporter");

    if let Some(addr) = prom_addr {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .add_global_label("cluster", cluster_name)
            .install()
            .expect("failed to install Prometheus recorder");
    }

    for name in COUNTERS {
        register_counter(name)
    }

    for name in HISTOGRAMS {
        register_histogram(name)
    }
}

/// Registers a counter with the given name.
fn register_counter(metric: Metric) {
    metrics::describe_counter!(metric.name, metric.description);
    let _counter = metrics::counter!(metric.name);
}

/// Registers a histogram with the given name.
fn register_histogram(metric: Metric) {
    metrics::describe_histogram!(metric.name, metric.description);
    let _histogram = metrics::histogram!(metric.name);
}
