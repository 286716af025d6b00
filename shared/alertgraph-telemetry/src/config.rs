//! Telemetry settings read from the environment

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `SERVICE_NAME`, falling back to the binary's own name
    pub service_name: String,
    /// OTLP gRPC collector; spans are exported only when set
    pub otlp_endpoint: Option<String>,
    /// Default directive when `RUST_LOG` is unset
    pub log_level: String,
    pub json_logs: bool,
}

impl TelemetryConfig {
    pub fn from_env(default_service: &str) -> Self {
        Self::from_lookup(default_service, |key| std::env::var(key).ok())
    }

    fn from_lookup(default_service: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            service_name: non_empty("SERVICE_NAME").unwrap_or_else(|| default_service.to_string()),
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
            log_level: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            json_logs: non_empty("JSON_LOGS").map_or(true, |v| v == "true" || v == "1"),
        }
    }
}
