//! Background eviction of expired rate limit counters.

use crate::services::{metrics::AppMetrics, rate_limit::RateLimiter};
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

/// Sweep every limiter's store once, at each limiter's own clock
///
/// Returns the total number of evicted records.
pub fn sweep_once(limiters: &[Arc<RateLimiter>], metrics: Option<&AppMetrics>) -> usize {
    limiters
        .iter()
        .map(|limiter| {
            let removed = limiter.store().sweep_expired(limiter.now_ms());
            let tracked = limiter.store().len();

            if let Some(metrics) = metrics {
                metrics.record_sweep(limiter.name(), removed, tracked);
            }

            if removed > 0 {
                tracing::debug!(
                    target: "rate_limit",
                    policy = %limiter.name(),
                    removed,
                    tracked,
                    "Swept expired rate limit counters"
                );
            }

            removed
        })
        .sum()
}

/// Spawn the periodic sweep on the current tokio runtime
///
/// The first sweep runs one full `interval` after spawning. The task runs
/// until the returned handle is aborted or the runtime shuts down.
pub fn spawn_sweeper(
    limiters: Vec<Arc<RateLimiter>>,
    interval: Duration,
    metrics: Option<AppMetrics>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            target: "rate_limit",
            limiters = limiters.len(),
            interval_ms = interval.as_millis() as u64,
            "Rate limit sweeper started"
        );

        loop {
            ticker.tick().await;
            sweep_once(&limiters, metrics.as_ref());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RateLimitConfig, utils::clock::ManualClock};

    fn limiter(name: &str, window_ms: u64, clock: &ManualClock) -> Arc<RateLimiter> {
        Arc::new(
            RateLimiter::with_clock(
                name,
                RateLimitConfig::new(5, window_ms),
                Arc::new(clock.clone()),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_sweep_once_evicts_per_limiter_window() {
        let clock = ManualClock::new(0);
        let short = limiter("short", 100, &clock);
        let long = limiter("long", 10_000, &clock);

        short.check("a", "/x");
        short.check("b", "/x");
        long.check("a", "/x");

        clock.set(101);
        let metrics = AppMetrics::new().unwrap();
        let removed = sweep_once(&[Arc::clone(&short), Arc::clone(&long)], Some(&metrics));

        assert_eq!(removed, 2);
        assert!(short.store().is_empty());
        assert_eq!(long.store().len(), 1);

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("rate_limit_swept_records_total{policy=\"short\"} 2"));
        assert!(rendered.contains("rate_limit_tracked_keys{policy=\"long\"} 1"));
        assert!(rendered.contains("rate_limit_tracked_keys{policy=\"short\"} 0"));
    }

    #[test]
    fn test_sweep_does_not_change_admission() {
        let clock = ManualClock::new(0);
        let limiter = limiter("p", 100, &clock);

        for _ in 0..5 {
            limiter.check("a", "/x");
        }
        assert!(!limiter.check("a", "/x").admitted);

        // Window still live: nothing to sweep, quota stays exhausted
        clock.set(100);
        assert_eq!(sweep_once(&[Arc::clone(&limiter)], None), 0);
        assert!(!limiter.check("a", "/x").admitted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_sweeper_runs_on_interval() {
        let clock = ManualClock::new(0);
        let limiter = limiter("p", 50, &clock);
        limiter.check("a", "/x");
        clock.set(1_000);

        let handle = spawn_sweeper(vec![Arc::clone(&limiter)], Duration::from_secs(60), None);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(limiter.store().len(), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(limiter.store().is_empty());

        handle.abort();
    }
}
