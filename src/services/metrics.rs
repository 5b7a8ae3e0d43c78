//! Metrics collection and Prometheus integration service.

use crate::{config::DEFAULT_METRICS_ENDPOINT, utils::build_info};
use prometheus::{
    CounterVec, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::{Duration, Instant};

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    pub rate_limit_decisions_total: CounterVec,
    pub rate_limit_swept_records_total: CounterVec,
    pub rate_limit_tracked_keys: GaugeVec,
    pub start_time: Instant,
    excluded_route: String,
}

impl AppMetrics {
    /// Create a new metrics collector that skips the default scrape endpoint
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::excluding(DEFAULT_METRICS_ENDPOINT)
    }

    /// Create a new metrics collector that never records `scrape_route`
    pub fn excluding(scrape_route: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // HTTP request counter by method, status, and route
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        // Admission decisions by limiter policy and outcome
        let rate_limit_decisions_total = CounterVec::new(
            Opts::new(
                "rate_limit_decisions_total",
                "Rate limit decisions by policy and outcome",
            ),
            &["policy", "outcome"],
        )?;

        let rate_limit_swept_records_total = CounterVec::new(
            Opts::new(
                "rate_limit_swept_records_total",
                "Expired rate limit counters evicted by the sweeper",
            ),
            &["policy"],
        )?;

        let rate_limit_tracked_keys = GaugeVec::new(
            Opts::new(
                "rate_limit_tracked_keys",
                "Rate limit counters held after the last sweep",
            ),
            &["policy"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(rate_limit_decisions_total.clone()))?;
        registry.register(Box::new(rate_limit_swept_records_total.clone()))?;
        registry.register(Box::new(rate_limit_tracked_keys.clone()))?;

        app_info
            .with_label_values(&[
                build_info::VERSION,
                build_info::GIT_SHA,
                build_info::BUILD_TIMESTAMP,
            ])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            app_uptime_seconds,
            app_info,
            rate_limit_decisions_total,
            rate_limit_swept_records_total,
            rate_limit_tracked_keys,
            start_time: Instant::now(),
            excluded_route: scrape_route.to_string(),
        })
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == self.excluded_route {
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    pub fn record_rate_limit_decision(&self, policy: &str, admitted: bool) {
        let outcome = if admitted { "admitted" } else { "rejected" };
        self.rate_limit_decisions_total
            .with_label_values(&[policy, outcome])
            .inc();
    }

    pub fn record_sweep(&self, policy: &str, removed: usize, tracked: usize) {
        self.rate_limit_swept_records_total
            .with_label_values(&[policy])
            .inc_by(removed as f64);
        self.rate_limit_tracked_keys
            .with_label_values(&[policy])
            .set(tracked as f64);
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        let uptime = self.start_time.elapsed().as_secs_f64();
        self.app_uptime_seconds.set(uptime);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value of the first sample of `name` whose labels mention every needle
    fn sample(rendered: &str, name: &str, needles: &[&str]) -> Option<f64> {
        rendered
            .lines()
            .filter(|line| line.starts_with(name) && !line.starts_with('#'))
            .find(|line| needles.iter().all(|n| line.contains(&format!("\"{n}\""))))
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|value| value.parse().ok())
    }

    #[test]
    fn test_rate_limit_decisions_rendered() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_rate_limit_decision("video_upload", true);
        metrics.record_rate_limit_decision("video_upload", true);
        metrics.record_rate_limit_decision("video_upload", false);

        let rendered = metrics.render().unwrap();
        assert_eq!(sample(&rendered, "rate_limit_decisions_total", &["admitted", "video_upload"]), Some(2.0));
        assert_eq!(sample(&rendered, "rate_limit_decisions_total", &["rejected", "video_upload"]), Some(1.0));
    }

    #[test]
    fn test_scrape_route_not_recorded() {
        let metrics = AppMetrics::excluding("/internal/metrics").unwrap();
        metrics.record_request("GET", "/internal/metrics", 200, Duration::from_millis(3));
        metrics.record_request("GET", "/api/health", 200, Duration::from_millis(3));

        let rendered = metrics.render().unwrap();
        assert!(!rendered.contains("route=\"/internal/metrics\""));
        assert!(rendered.contains("route=\"/api/health\""));
    }
}
