//! Fixed-window rate limiting for API routes.
//!
//! A [`RateLimiter`] counts admitted requests per `client:route` key inside a
//! fixed window. The first request of a window opens it, exactly `limit`
//! requests are admitted, and rejected requests are not counted. A window
//! ends strictly after its `reset_at` instant; the next request after that
//! opens a fresh one.

use crate::{
    config::{RateLimitConfig, RateLimitConfigError},
    models::ErrorResponse,
    services::{
        metrics::AppMetrics,
        rate_limit_store::{CounterRecord, RateLimitStore},
    },
    utils::{
        clock::{Clock, SystemClock},
        http::extract_client_identity,
        route::route_identity,
    },
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc};

pub const DEFAULT_POLICY: &str = "default";
pub const DEFAULT_REJECTION_MESSAGE: &str = "Too many requests. Please try again later.";

pub const RETRY_AFTER_HEADER: &str = "Retry-After";
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";

/// Outcome of a single rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub admitted: bool,
    /// Quota left in the current window after this call, 0 when rejected
    pub remaining: u32,
    /// Milliseconds since the Unix epoch at which the current window ends
    pub reset_at: u64,
}

/// Per-route request limiter with its own counter store
pub struct RateLimiter {
    name: String,
    config: RateLimitConfig,
    store: RateLimitStore,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a limiter on the system clock
    pub fn new(name: impl Into<String>, config: RateLimitConfig) -> Result<Self, RateLimitConfigError> {
        Self::with_clock(name, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        name: impl Into<String>,
        config: RateLimitConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RateLimitConfigError> {
        config.validate()?;

        Ok(Self {
            name: name.into(),
            config,
            store: RateLimitStore::new(),
            clock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    pub fn store(&self) -> &RateLimitStore {
        &self.store
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Check and count one request from `client` against `route`
    pub fn check(&self, client: &str, route: &str) -> Decision {
        self.check_at(client, route, self.clock.now_ms())
    }

    /// Same as [`RateLimiter::check`] at an explicit instant
    pub fn check_at(&self, client: &str, route: &str, now_ms: u64) -> Decision {
        let key = format!("{client}:{route}");
        let RateLimitConfig { limit, window_ms } = self.config;

        self.store.with_records(|records| match records.get_mut(&key) {
            Some(record) if !record.is_expired(now_ms) => {
                if record.count >= limit {
                    Decision {
                        admitted: false,
                        remaining: 0,
                        reset_at: record.reset_at,
                    }
                } else {
                    record.count += 1;
                    Decision {
                        admitted: true,
                        remaining: limit - record.count,
                        reset_at: record.reset_at,
                    }
                }
            }
            _ => {
                let reset_at = now_ms.saturating_add(window_ms);
                records.insert(key, CounterRecord { count: 1, reset_at });
                Decision {
                    admitted: true,
                    remaining: limit - 1,
                    reset_at,
                }
            }
        })
    }
}

/// Named limiters, one per endpoint policy
#[derive(Clone, Default)]
pub struct RateLimiterRegistry {
    limiters: BTreeMap<String, Arc<RateLimiter>>,
}

impl RateLimiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and register a limiter for `name`, replacing any previous one
    pub fn register(
        &mut self,
        name: &str,
        config: RateLimitConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Arc<RateLimiter>, RateLimitConfigError> {
        let limiter = Arc::new(RateLimiter::with_clock(name, config, clock)?);
        self.limiters.insert(name.to_string(), Arc::clone(&limiter));
        Ok(limiter)
    }

    pub fn get(&self, name: &str) -> Option<Arc<RateLimiter>> {
        self.limiters.get(name).cloned()
    }

    /// All limiters, ordered by name
    pub fn limiters(&self) -> Vec<Arc<RateLimiter>> {
        self.limiters.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}

/// Whole seconds until `reset_at`, rounded up and never negative
pub fn retry_after_seconds(reset_at: u64, now_ms: u64) -> u64 {
    reset_at.saturating_sub(now_ms).div_ceil(1000)
}

/// Standard 429 response for a rejected decision
pub fn rate_limit_response(reset_at: u64, message: Option<&str>) -> HttpResponse {
    rate_limit_response_at(reset_at, SystemClock.now_ms(), message)
}

/// Same as [`rate_limit_response`] at an explicit instant
pub fn rate_limit_response_at(reset_at: u64, now_ms: u64, message: Option<&str>) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header((
            RETRY_AFTER_HEADER,
            retry_after_seconds(reset_at, now_ms).to_string(),
        ))
        .insert_header((RATE_LIMIT_RESET_HEADER, reset_at.to_string()))
        .json(ErrorResponse {
            error: message.unwrap_or(DEFAULT_REJECTION_MESSAGE).to_string(),
        })
}

/// Rate limit a request inline from a handler
///
/// Keys the check on the client identity and the request path. Returns the
/// admitted decision, or the ready-made 429 response when the quota for the
/// current window is used up.
pub fn check_request(req: &HttpRequest, limiter: &RateLimiter) -> Result<Decision, HttpResponse> {
    let client = extract_client_identity(req);
    let route = route_identity(req);
    let now_ms = limiter.now_ms();
    let decision = limiter.check_at(&client, &route, now_ms);

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_rate_limit_decision(limiter.name(), decision.admitted);
    }

    if decision.admitted {
        tracing::debug!(
            target: "rate_limit",
            policy = %limiter.name(),
            client = %client,
            route = %route,
            remaining = decision.remaining,
            "Request admitted"
        );
        Ok(decision)
    } else {
        tracing::warn!(
            target: "rate_limit",
            policy = %limiter.name(),
            client = %client,
            route = %route,
            reset_at = decision.reset_at,
            "Rate limit exceeded"
        );
        Err(rate_limit_response_at(decision.reset_at, now_ms, None))
    }
}
