//! Metrics configuration.

use std::env;

pub const DEFAULT_METRICS_ENDPOINT: &str = "/api/metrics";

/// Configuration for application metrics collection
#[derive(Clone)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path the Prometheus scrape endpoint is mounted on; never recorded itself
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_METRICS_ENDPOINT.to_string(),
        }
    }
}

impl MetricsConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let enabled = env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let endpoint = env::var("METRICS_ENDPOINT")
            .ok()
            .filter(|v| v.starts_with('/'))
            .unwrap_or_else(|| DEFAULT_METRICS_ENDPOINT.to_string());

        Self { enabled, endpoint }
    }
}
