//! Shared application state built once at startup.

use crate::{
    config::{MetricsConfig, RateLimitConfig, RateLimitPolicies},
    error::StartupError,
    services::{
        metrics::AppMetrics,
        rate_limit::{DEFAULT_POLICY, RateLimiter, RateLimiterRegistry},
    },
    utils::clock::{Clock, SystemClock},
};
use std::sync::Arc;

/// Limiters, metrics and their configuration
///
/// Built once before the HTTP server starts and cloned into every worker,
/// so all workers count against the same stores.
#[derive(Clone)]
pub struct AppState {
    /// Limiter guarding the built-in endpoints
    pub default_limiter: Arc<RateLimiter>,
    /// Every limiter including the default one, keyed by policy name
    pub registry: RateLimiterRegistry,
    pub metrics: AppMetrics,
    pub metrics_config: MetricsConfig,
}

impl AppState {
    pub fn new(
        default_config: RateLimitConfig,
        policies: &RateLimitPolicies,
        metrics_config: MetricsConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StartupError> {
        let mut registry = RateLimiterRegistry::new();

        for (name, config) in policies.iter() {
            register(&mut registry, name, config, &clock)?;
        }
        let default_limiter = register(&mut registry, DEFAULT_POLICY, default_config, &clock)?;

        let metrics = AppMetrics::excluding(&metrics_config.endpoint)?;

        Ok(Self {
            default_limiter,
            registry,
            metrics,
            metrics_config,
        })
    }

    /// Load every component from environment variables on the system clock
    pub fn from_env() -> Result<Self, StartupError> {
        Self::new(
            RateLimitConfig::from_env(),
            &RateLimitPolicies::default(),
            MetricsConfig::from_env(),
            Arc::new(SystemClock),
        )
    }

    pub fn limiter(&self, policy: &str) -> Option<Arc<RateLimiter>> {
        self.registry.get(policy)
    }
}

fn register(
    registry: &mut RateLimiterRegistry,
    name: &str,
    config: RateLimitConfig,
    clock: &Arc<dyn Clock>,
) -> Result<Arc<RateLimiter>, StartupError> {
    registry
        .register(name, config, Arc::clone(clock))
        .map_err(|source| StartupError::InvalidPolicy {
            policy: name.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::VIDEO_UPLOAD_POLICY, utils::clock::ManualClock};

    #[test]
    fn test_state_registers_default_and_policies() {
        let state = AppState::new(
            RateLimitConfig::new(2, 1000),
            &RateLimitPolicies::default(),
            MetricsConfig::default(),
            Arc::new(ManualClock::new(0)),
        )
        .unwrap();

        assert_eq!(state.registry.len(), 8);
        assert_eq!(state.default_limiter.name(), DEFAULT_POLICY);
        assert_eq!(state.default_limiter.config().limit, 2);
        assert_eq!(
            state.limiter(VIDEO_UPLOAD_POLICY).map(|l| l.config().limit),
            Some(10)
        );
    }

    #[test]
    fn test_invalid_policy_aborts_startup() {
        let policies = RateLimitPolicies::empty().with_policy("broken", RateLimitConfig::new(0, 1000));
        let err = AppState::new(
            RateLimitConfig::default(),
            &policies,
            MetricsConfig::default(),
            Arc::new(SystemClock),
        )
        .err()
        .unwrap();

        assert!(matches!(err, StartupError::InvalidPolicy { ref policy, .. } if policy == "broken"));
    }
}
