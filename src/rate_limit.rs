use dashmap::DashMap;
use std::time::{Duration, Instant};

// Rate limit record - tracks requests per client key within the current window
pub struct RateWindowRecord {
    pub count: u32,
    pub window_start: Instant,
}

/// Admission store for the fixed-window limiter.
///
/// The in-memory map below is one implementation; a store shared across
/// gateway instances would be another. Implementations must keep the per-key
/// check-then-update atomic, since handlers run on a multithreaded runtime.
pub trait RateStore: Send + Sync {
    /// Apply the fixed-window policy for `key` at time `now`.
    /// Returns true when the request is admitted.
    fn check(&self, key: &str, now: Instant) -> bool;

    /// Number of client keys currently tracked.
    fn tracked_clients(&self) -> usize;

    fn admit(&self, key: &str) -> bool {
        self.check(key, Instant::now())
    }
}

pub struct InMemoryRateStore {
    records: DashMap<String, RateWindowRecord>,
    max_requests: u32,
    window: Duration,
}

impl InMemoryRateStore {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            records: DashMap::new(),
            max_requests,
            window,
        }
    }
}

impl RateStore for InMemoryRateStore {
    fn check(&self, key: &str, now: Instant) -> bool {
        // The entry guard holds the shard lock for the whole
        // check-then-update, so concurrent requests for one key can't race
        let mut entry = self
            .records
            .entry(key.to_string())
            .or_insert_with(|| RateWindowRecord {
                count: 0,
                window_start: now,
            });

        // Window expired? Replace the record, prior history is discarded
        if now.duration_since(entry.window_start) > self.window {
            entry.count = 1;
            entry.window_start = now;
            return true;
        }

        // At the cap? Reject without incrementing
        if entry.count >= self.max_requests {
            return false;
        }

        entry.count += 1;
        true
    }

    fn tracked_clients(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn admits_until_cap_then_rejects() {
        let store = InMemoryRateStore::new(50, HOUR);
        let now = Instant::now();

        for _ in 0..50 {
            assert!(store.check("1.2.3.4", now));
        }
        assert!(!store.check("1.2.3.4", now));
        assert!(!store.check("1.2.3.4", now + Duration::from_secs(60)));
    }

    #[test]
    fn new_window_discards_prior_history() {
        let store = InMemoryRateStore::new(3, HOUR);
        let t0 = Instant::now();

        for _ in 0..3 {
            assert!(store.check("client", t0));
        }
        assert!(!store.check("client", t0));

        // first request of the next window is admitted even after over-cap attempts
        let t1 = t0 + HOUR + Duration::from_secs(1);
        assert!(store.check("client", t1));
        assert!(store.check("client", t1));
    }

    #[test]
    fn window_resets_only_after_full_length() {
        let store = InMemoryRateStore::new(1, HOUR);
        let t0 = Instant::now();

        assert!(store.check("client", t0));
        // exactly one hour later the window is still open
        assert!(!store.check("client", t0 + HOUR));
        assert!(store.check("client", t0 + HOUR + Duration::from_secs(1)));
    }

    #[test]
    fn keys_are_tracked_independently() {
        let store = InMemoryRateStore::new(1, HOUR);
        let now = Instant::now();

        assert!(store.check("1.2.3.4", now));
        assert!(store.check("5.6.7.8", now));
        assert!(!store.check("1.2.3.4", now));
        assert_eq!(store.tracked_clients(), 2);
    }

    #[test]
    fn boundary_burst_spans_two_windows() {
        // fixed-window artifact: a burst at the end of one window plus a
        // burst at the start of the next admits close to 2N in short order
        let store = InMemoryRateStore::new(5, HOUR);
        let t0 = Instant::now();

        assert!(store.check("client", t0));
        let late = t0 + HOUR - Duration::from_secs(1);
        for _ in 0..4 {
            assert!(store.check("client", late));
        }
        assert!(!store.check("client", late));

        let next = t0 + HOUR + Duration::from_secs(1);
        for _ in 0..5 {
            assert!(store.check("client", next));
        }
        assert!(!store.check("client", next));
    }
}
