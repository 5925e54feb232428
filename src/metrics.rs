//! Prometheus instruments for renders and queries, plus `tracing` span helpers.
//!
//! Both halves are feature gated: `metrics` pulls in the OpenTelemetry stack and
//! `tracing` the span helpers used by the executor and the composer.

#[cfg(feature = "metrics")]
pub use prometheus_metrics::{TableMetrics, METRICS};

#[cfg(feature = "metrics")]
mod prometheus_metrics {
    use once_cell::sync::Lazy;
    use opentelemetry::{
        global,
        metrics::{Counter, Histogram, Meter, MeterProvider},
        KeyValue,
    };
    use opentelemetry_sdk::metrics::SdkMeterProvider;
    use prometheus::{Registry, TextEncoder};
    use std::time::Duration;

    pub static METRICS: Lazy<TableMetrics> = Lazy::new(TableMetrics::init);

    pub struct TableMetrics {
        pub registry: Registry,
        provider: Option<SdkMeterProvider>,
        pub renders_total: Counter<u64>,
        pub render_duration: Histogram<f64>,
        pub queries_total: Counter<u64>,
        pub query_duration: Histogram<f64>,
        pub query_errors_total: Counter<u64>,
    }

    impl TableMetrics {
        pub fn init() -> Self {
            let registry = Registry::new();
            let provider = match opentelemetry_prometheus::exporter()
                .with_registry(registry.clone())
                .build()
            {
                Ok(exporter) => Some(SdkMeterProvider::builder().with_reader(exporter).build()),
                Err(e) => {
                    log::warn!("prometheus exporter unavailable, using the global meter: {e}");
                    None
                }
            };
            let meter: Meter = match &provider {
                Some(provider) => provider.meter("inertia_table"),
                None => global::meter("inertia_table"),
            };

            let renders_total = meter
                .u64_counter("inertia_table_renders_total")
                .with_description("Table payloads rendered")
                .build();

            let render_duration = meter
                .f64_histogram("inertia_table_render_duration_seconds")
                .with_description("Duration of a table render including queries")
                .build();

            let queries_total = meter
                .u64_counter("inertia_table_queries_total")
                .with_description("Total queries executed")
                .build();

            let query_duration = meter
                .f64_histogram("inertia_table_query_duration_seconds")
                .with_description("Duration of queries")
                .build();

            let query_errors_total = meter
                .u64_counter("inertia_table_query_errors_total")
                .with_description("Queries that returned an error")
                .build();

            Self {
                registry,
                provider,
                renders_total,
                render_duration,
                queries_total,
                query_duration,
                query_errors_total,
            }
        }

        pub fn record_render(&self, model: &str, elapsed: Duration) {
            let attrs = [KeyValue::new("model", model.to_string())];
            self.renders_total.add(1, &attrs);
            self.render_duration.record(elapsed.as_secs_f64(), &attrs);
        }

        pub fn record_query(&self, elapsed: Duration) {
            self.queries_total.add(1, &[]);
            self.query_duration.record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_query_error(&self) {
            self.query_errors_total.add(1, &[]);
        }

        /// Whether instruments report to the Prometheus registry.
        pub fn is_exporting(&self) -> bool {
            self.provider.is_some()
        }

        /// Current metrics in the Prometheus text exposition format.
        pub fn render_text(&self) -> String {
            match TextEncoder::new().encode_to_string(&self.registry.gather()) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("failed to encode metrics: {e}");
                    String::new()
                }
            }
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{info_span, Span};

    /// Span wrapping one statement; the SQL is truncated to keep spans small.
    pub fn execute_query_span(sql: &str) -> Span {
        let statement: String = sql.chars().take(200).collect();
        info_span!("inertia_table.query", db.system = "postgresql", db.statement = %statement)
    }

    pub fn acquire_connection_span() -> Span {
        info_span!("inertia_table.connect", db.system = "postgresql")
    }

    pub fn render_span(model: &str) -> Span {
        info_span!("inertia_table.render", model = %model)
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::METRICS;
    use std::time::Duration;

    #[test]
    fn test_render_metrics_are_exported() {
        METRICS.record_render("Post", Duration::from_millis(3));
        METRICS.record_query(Duration::from_millis(1));
        if METRICS.is_exporting() {
            let text = METRICS.render_text();
            assert!(text.contains("inertia_table_renders_total"), "{text}");
            assert!(text.contains("inertia_table_query_duration_seconds"), "{text}");
        }
    }
}
