//! Rate limiting configuration.

use std::env;
use std::time::Duration;

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;

/// Errors raised when a limiter is built from an unusable configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitConfigError {
    #[error("rate limit window must be greater than zero")]
    ZeroWindow,

    #[error("rate limit quota must be greater than zero")]
    ZeroLimit,
}

/// Quota for one limiter: `limit` admitted requests per `window_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub limit: u32,
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 60,
            window_ms: MINUTE_MS,
        }
    }
}

impl RateLimitConfig {
    pub fn new(limit: u32, window_ms: u64) -> Self {
        Self { limit, window_ms }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, MINUTE_MS)
    }

    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, HOUR_MS)
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let limit = env::var("RATE_LIMIT_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.limit);

        let window_ms = env::var("RATE_LIMIT_WINDOW_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.window_ms);

        Self { limit, window_ms }
    }

    /// Reject quotas that could never admit a request
    pub fn validate(&self) -> Result<(), RateLimitConfigError> {
        if self.window_ms == 0 {
            return Err(RateLimitConfigError::ZeroWindow);
        }
        if self.limit == 0 {
            return Err(RateLimitConfigError::ZeroLimit);
        }
        Ok(())
    }
}

/// Interval of the background task that evicts expired counters.
///
/// Deliberately independent of any limiter window: the sweep only bounds
/// memory, admission decisions never depend on it.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    pub interval_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_ms: MINUTE_MS,
        }
    }
}

impl SweepConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let interval_ms = env::var("RATE_LIMIT_SWEEP_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u64| *v > 0)
            .unwrap_or(MINUTE_MS);

        Self { interval_ms }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

pub const REGISTER_POLICY: &str = "register";
pub const VIDEO_UPLOAD_POLICY: &str = "video_upload";
pub const VIDEO_FETCH_POLICY: &str = "video_fetch";
pub const SCHEDULE_FETCH_POLICY: &str = "schedule_fetch";
pub const SCHEDULE_MUTATE_POLICY: &str = "schedule_mutate";
pub const USER_FETCH_POLICY: &str = "user_fetch";
pub const USER_UPDATE_POLICY: &str = "user_update";

/// Per-endpoint quotas of the dashboard API
///
/// Each policy gets its own limiter and store, so a read policy and a write
/// policy guarding the same path never share counters. The built-in app only
/// guards `/api/version` (with the default limiter); the policy limiters are
/// registered, swept and listed, and embedders mount them on their own
/// resources with `RateLimitGuard::new(state.limiter(name))`.
#[derive(Debug, Clone)]
pub struct RateLimitPolicies {
    policies: Vec<(String, RateLimitConfig)>,
}

impl Default for RateLimitPolicies {
    fn default() -> Self {
        Self {
            policies: vec![
                (REGISTER_POLICY.to_string(), RateLimitConfig::per_hour(5)),
                (VIDEO_UPLOAD_POLICY.to_string(), RateLimitConfig::per_minute(10)),
                (VIDEO_FETCH_POLICY.to_string(), RateLimitConfig::per_minute(60)),
                (SCHEDULE_FETCH_POLICY.to_string(), RateLimitConfig::per_minute(60)),
                (SCHEDULE_MUTATE_POLICY.to_string(), RateLimitConfig::per_minute(30)),
                (USER_FETCH_POLICY.to_string(), RateLimitConfig::per_minute(30)),
                (USER_UPDATE_POLICY.to_string(), RateLimitConfig::per_minute(10)),
            ],
        }
    }
}

impl RateLimitPolicies {
    pub fn empty() -> Self {
        Self {
            policies: Vec::new(),
        }
    }

    /// Add or replace a named policy
    pub fn with_policy(mut self, name: impl Into<String>, config: RateLimitConfig) -> Self {
        let name = name.into();
        match self.policies.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = config,
            None => self.policies.push((name, config)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<RateLimitConfig> {
        self.policies
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, config)| *config)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, RateLimitConfig)> {
        self.policies
            .iter()
            .map(|(name, config)| (name.as_str(), *config))
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to synchronize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_match_one_minute_window() {
        let config = RateLimitConfig::default();
        assert_eq!(config.limit, 60);
        assert_eq!(config.window_ms, 60_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        assert_eq!(
            RateLimitConfig::new(10, 0).validate(),
            Err(RateLimitConfigError::ZeroWindow)
        );
        assert_eq!(
            RateLimitConfig::new(0, 1000).validate(),
            Err(RateLimitConfigError::ZeroLimit)
        );
    }

    #[test]
    fn test_rate_limit_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("RATE_LIMIT_LIMIT", "7");
            env::set_var("RATE_LIMIT_WINDOW_MS", "2500");
        }

        let config = RateLimitConfig::from_env();
        assert_eq!(config.limit, 7);
        assert_eq!(config.window_ms, 2500);

        unsafe {
            env::set_var("RATE_LIMIT_LIMIT", "not-a-number");
            env::remove_var("RATE_LIMIT_WINDOW_MS");
        }

        let config = RateLimitConfig::from_env();
        assert_eq!(config, RateLimitConfig::default());

        unsafe {
            env::remove_var("RATE_LIMIT_LIMIT");
        }
    }

    #[test]
    fn test_sweep_interval_ignores_zero() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var("RATE_LIMIT_SWEEP_INTERVAL_MS", "0");
        }
        assert_eq!(SweepConfig::from_env().interval_ms, 60_000);

        unsafe {
            env::set_var("RATE_LIMIT_SWEEP_INTERVAL_MS", "500");
        }
        assert_eq!(SweepConfig::from_env().interval(), Duration::from_millis(500));

        unsafe {
            env::remove_var("RATE_LIMIT_SWEEP_INTERVAL_MS");
        }
    }

    #[test]
    fn test_dashboard_policies() {
        let policies = RateLimitPolicies::default();
        assert_eq!(policies.len(), 7);
        assert_eq!(
            policies.get(REGISTER_POLICY),
            Some(RateLimitConfig::new(5, 3_600_000))
        );
        assert_eq!(
            policies.get(VIDEO_UPLOAD_POLICY),
            Some(RateLimitConfig::per_minute(10))
        );
        assert_eq!(policies.get("unknown"), None);
    }

    #[test]
    fn test_with_policy_replaces_existing() {
        let policies = RateLimitPolicies::default()
            .with_policy(USER_UPDATE_POLICY, RateLimitConfig::per_minute(3))
            .with_policy("clips", RateLimitConfig::per_minute(100));

        assert_eq!(policies.len(), 8);
        assert_eq!(
            policies.get(USER_UPDATE_POLICY),
            Some(RateLimitConfig::per_minute(3))
        );
        assert_eq!(policies.get("clips").map(|c| c.limit), Some(100));
    }
}
