use dashmap::DashMap;
use std::time::{Duration, Instant};

// Per-identity window - admitted requests since window_start
pub struct RateWindow {
    pub count: u32,
    pub window_start: Instant,
}

// Fixed-window rate limiter. One window per client identity, created lazily.
// Windows for idle identities are never evicted while the process lives.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    enabled: bool,
    windows: DashMap<String, RateWindow>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration, enabled: bool) -> Self {
        Self {
            limit,
            window,
            enabled,
            windows: DashMap::new(),
        }
    }

    // Admission check. `now` is injected so tests don't need a real clock.
    // The entry guard keeps read-reset-compare-increment atomic per identity.
    pub fn admit(&self, identity: &str, now: Instant) -> bool {
        if !self.enabled {
            return true;
        }

        let mut entry = self
            .windows
            .entry(identity.to_string())
            .or_insert(RateWindow {
                count: 0,
                window_start: now,
            });

        // window expired..? Reset it
        if now.duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        // under limit..? Admit
        if entry.count < self.limit {
            entry.count += 1;
            return true;
        }

        // over limit - reject without touching the count
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn admits_exactly_limit_then_rejects() {
        let limiter = RateLimiter::new(3, secs(60), true);
        let t0 = Instant::now();

        for _ in 0..3 {
            assert!(limiter.admit("a", t0));
        }
        assert!(!limiter.admit("a", t0));
    }

    #[test]
    fn window_expiry_resets_count() {
        let limiter = RateLimiter::new(2, secs(60), true);
        let t0 = Instant::now();

        assert!(limiter.admit("a", t0));
        assert!(limiter.admit("a", t0 + secs(10)));
        assert!(!limiter.admit("a", t0 + secs(20)));

        // past the window boundary: fresh window, count restarts at 1
        assert!(limiter.admit("a", t0 + secs(61)));
        assert!(limiter.admit("a", t0 + secs(62)));
        assert!(!limiter.admit("a", t0 + secs(63)));
    }

    #[test]
    fn identities_do_not_share_quota() {
        let limiter = RateLimiter::new(1, secs(30), true);
        let t0 = Instant::now();

        assert!(limiter.admit("a", t0));
        assert!(limiter.admit("b", t0));
        assert!(!limiter.admit("a", t0 + secs(1)));
        assert!(!limiter.admit("b", t0 + secs(1)));
    }

    #[test]
    fn exhausting_one_identity_leaves_another_admittable() {
        let limiter = RateLimiter::new(2, secs(60), true);
        let t0 = Instant::now();

        assert!(limiter.admit("a", t0));
        assert!(limiter.admit("a", t0));
        assert!(!limiter.admit("a", t0));

        assert!(limiter.admit("b", t0));
    }

    #[test]
    fn disabled_always_admits() {
        let limiter = RateLimiter::new(1, secs(60), false);
        let t0 = Instant::now();

        for _ in 0..100 {
            assert!(limiter.admit("a", t0));
        }
    }

    #[test]
    fn zero_limit_rejects_first_request() {
        let limiter = RateLimiter::new(0, secs(60), true);
        assert!(!limiter.admit("a", Instant::now()));
    }

    #[test]
    fn rejection_does_not_shift_the_window() {
        let limiter = RateLimiter::new(2, secs(60), true);
        let t0 = Instant::now();

        assert!(limiter.admit("a", t0));
        assert!(limiter.admit("a", t0 + secs(10)));
        assert!(!limiter.admit("a", t0 + secs(50)));
        // the rejected call at t+50 must not have restarted the window
        assert!(limiter.admit("a", t0 + secs(61)));
    }
}
