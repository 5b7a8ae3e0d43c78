//! HTTP server and log output configuration.

use std::env;
use std::path::Path;

const LOCAL_BIND_ADDRESS: &str = "127.0.0.1:8080";
const CONTAINER_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Configuration for the HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: LOCAL_BIND_ADDRESS.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// Inside Kubernetes or Docker the server listens on all interfaces so the
    /// container port mapping can reach it; `BIND_ADDRESS` always wins.
    pub fn from_env() -> Self {
        let bind_address = resolve_bind_address(
            env::var("BIND_ADDRESS").ok().as_deref(),
            is_container_environment(
                env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
                env::var("DOCKER_CONTAINER").ok().as_deref(),
                Path::new("/.dockerenv").exists(),
            ),
        );

        let log_format = env::var("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Pretty);

        Self {
            bind_address,
            log_format,
        }
    }
}

fn is_container_environment(
    k8s_service_host: Option<&str>,
    docker_container: Option<&str>,
    dockerenv_exists: bool,
) -> bool {
    k8s_service_host.is_some() || docker_container.is_some() || dockerenv_exists
}

fn resolve_bind_address(bind_override: Option<&str>, in_container: bool) -> String {
    match bind_override {
        Some(bind) if !bind.trim().is_empty() => bind.trim().to_string(),
        _ if in_container => CONTAINER_BIND_ADDRESS.to_string(),
        _ => LOCAL_BIND_ADDRESS.to_string(),
    }
}
