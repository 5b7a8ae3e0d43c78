//! In-memory counter store backing a rate limiter.

use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};

/// Counter for one `(client, route)` window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterRecord {
    /// Requests admitted in the current window, starting at 1
    pub count: u32,
    /// Milliseconds since the Unix epoch at which the window ends
    pub reset_at: u64,
}

impl CounterRecord {
    /// A window is still live at its exact reset instant
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.reset_at
    }
}

/// Shared map of rate limit counters
///
/// Cloning yields another handle to the same map. A single coarse lock guards
/// the whole map; request rates on the dashboard are low enough that per-key
/// sharding buys nothing.
#[derive(Debug, Clone, Default)]
pub struct RateLimitStore {
    records: Arc<Mutex<HashMap<String, CounterRecord>>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to the map.
    ///
    /// The lock is held for the whole closure, which is what makes a
    /// read-modify-write sequence atomic across concurrent callers.
    pub(crate) fn with_records<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, CounterRecord>) -> R,
    ) -> R {
        let mut records = self.records.lock();
        f(&mut records)
    }

    pub fn get(&self, key: &str) -> Option<CounterRecord> {
        self.records.lock().get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Remove every record whose window ended before `now_ms`
    ///
    /// Returns the number of evicted records.
    pub fn sweep_expired(&self, now_ms: u64) -> usize {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now_ms));
        before - records.len()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}
