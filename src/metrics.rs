//! Metrics and tracing helpers.
//!
//! With the `metrics` feature the crate keeps a Prometheus-backed set of
//! OpenTelemetry instruments in [`METRICS`]. With the `tracing` feature,
//! [`tracing_helpers`] provides the spans the executor and the pipeline enter.

#[cfg(feature = "metrics")]
pub use self::prometheus_metrics::{SoftDeleteMetrics, METRICS};

#[cfg(feature = "metrics")]
mod prometheus_metrics {
    use once_cell::sync::Lazy;
    use opentelemetry::{
        global,
        metrics::{Counter, Histogram},
    };
    use opentelemetry_sdk::metrics::SdkMeterProvider;
    use prometheus::{Encoder, Registry, TextEncoder};
    use std::time::Duration;

    pub static METRICS: Lazy<SoftDeleteMetrics> = Lazy::new(SoftDeleteMetrics::init);

    pub struct SoftDeleteMetrics {
        pub registry: Registry,
        pub queries_total: Counter<u64>,
        pub query_errors_total: Counter<u64>,
        pub query_duration: Histogram<f64>,
        pub filters_applied_total: Counter<u64>,
        pub filters_bypassed_total: Counter<u64>,
        _provider: SdkMeterProvider,
    }

    impl SoftDeleteMetrics {
        pub fn init() -> Self {
            let registry = Registry::new();
            let exporter = opentelemetry_prometheus::exporter()
                .with_registry(registry.clone())
                .build()
                .expect("failed to build prometheus exporter");
            let provider = SdkMeterProvider::builder().with_reader(exporter).build();
            global::set_meter_provider(provider.clone());
            let meter = global::meter("lifeguard_softdelete");

            let queries_total = meter
                .u64_counter("lifeguard_queries_total")
                .with_description("Total queries executed")
                .build();

            let query_errors_total = meter
                .u64_counter("lifeguard_query_errors_total")
                .with_description("Queries that returned an error")
                .build();

            let query_duration = meter
                .f64_histogram("lifeguard_query_duration_seconds")
                .with_description("Duration of queries")
                .build();

            let filters_applied_total = meter
                .u64_counter("lifeguard_soft_delete_filters_applied_total")
                .with_description("deleted_at IS NULL predicates added to compiled queries")
                .build();

            let filters_bypassed_total = meter
                .u64_counter("lifeguard_soft_delete_filters_bypassed_total")
                .with_description("Queries compiled with include_deleted set")
                .build();

            Self {
                registry,
                queries_total,
                query_errors_total,
                query_duration,
                filters_applied_total,
                filters_bypassed_total,
                _provider: provider,
            }
        }

        pub fn record_query_duration(&self, elapsed: Duration) {
            self.queries_total.add(1, &[]);
            self.query_duration.record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_query_error(&self) {
            self.query_errors_total.add(1, &[]);
        }

        pub fn record_filters_applied(&self, count: u64) {
            if count > 0 {
                self.filters_applied_total.add(count, &[]);
            }
        }

        pub fn record_filter_bypassed(&self) {
            self.filters_bypassed_total.add(1, &[]);
        }

        /// Render the registry in the Prometheus text exposition format.
        pub fn render(&self) -> String {
            let mut buffer = Vec::new();
            let encoder = TextEncoder::new();
            if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
                log::warn!("failed to encode metrics: {e}");
            }
            String::from_utf8_lossy(&buffer).into_owned()
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{info_span, Span};

    /// Span around a single statement sent to PostgreSQL.
    pub fn execute_query_span(sql: &str) -> Span {
        info_span!("lifeguard.execute_query", db.statement = %sql)
    }

    /// Span around running a query through the compile pipeline.
    pub fn compile_query_span(table: &str, include_deleted: bool) -> Span {
        info_span!("lifeguard.compile_query", db.table = %table, include_deleted)
    }

    /// Span around flushing or committing a session.
    pub fn session_span(operation: &'static str) -> Span {
        info_span!("lifeguard.session", operation)
    }
}
