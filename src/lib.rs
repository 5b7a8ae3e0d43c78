//! Repurpose API - backend service of the content repurposing dashboard
//!
//! Built with Actix Web and Paperclip. The engineered part is request rate
//! limiting:
//! - Fixed-window counters keyed by client identity and route
//! - One independent limiter per endpoint policy
//! - Background sweeping of expired counters
//! - Standard 429 responses with `Retry-After` and `X-RateLimit-Reset`
//!
//! ## Architecture
//!
//! - `config/` - Configuration structures and environment loading
//! - `services/` - Rate limiter, counter store, sweeper and metrics
//! - `middleware/` - Rate limit guard, request IDs and metrics collection
//! - `handlers/` - HTTP request handlers and the app factory
//! - `models/` - Request/response models
//! - `utils/` - Client identity extraction, clock and build metadata
//!
//! ## Quick Start
//!
//! ```no_run
//! use repurpose_api::{AppState, create_app};
//! use actix_web::HttpServer;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let state = AppState::from_env()?;
//!     HttpServer::new(move || create_app(state.clone()))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use config::{
    LogFormat, MetricsConfig, RateLimitConfig, RateLimitConfigError, RateLimitPolicies,
    ServerConfig, SweepConfig,
};
pub use error::StartupError;
pub use handlers::{create_app, create_openapi_spec, get_metrics, health, rate_limit_status, version};
pub use middleware::{MetricsMiddleware, RateLimitGuard, RequestId, RequestIdMiddleware};
pub use models::{
    ErrorResponse, HealthResponse, RateLimitPolicyStatus, RateLimitStatusResponse,
    VersionResponse,
};
pub use services::{
    AppMetrics, CounterRecord, Decision, RateLimitStore, RateLimiter, RateLimiterRegistry,
    check_request, rate_limit_response, rate_limit_response_at, retry_after_seconds,
    spawn_sweeper, sweep_once,
};
pub use state::AppState;
pub use utils::{Clock, ManualClock, SystemClock, extract_client_identity, route_identity};
