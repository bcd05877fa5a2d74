//! In-memory sliding-window rate limiter, injected into the request handler
//! as a trait object so the core pipeline never depends on it.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const ENV_RATE_LIMIT_MAX: &str = "RATE_LIMIT_MAX";
pub const ENV_RATE_LIMIT_WINDOW_SECS: &str = "RATE_LIMIT_WINDOW_SECS";

const DEFAULT_MAX_REQUESTS: usize = 30;
const DEFAULT_WINDOW_SECS: u64 = 60;

/// Per-client admission decision, checked before the pipeline runs.
pub trait RateLimit: Send + Sync {
    fn allow(&self, key: &str) -> bool;
}

/// Never rejects; for tests and local runs.
pub struct AllowAll;

impl RateLimit for AllowAll {
    fn allow(&self, _key: &str) -> bool {
        true
    }
}

/// Maps each client key to a bounded list of recent request instants.
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    state: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            state: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_env() -> Self {
        let max = std::env::var(ENV_RATE_LIMIT_MAX)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_REQUESTS);
        let secs = std::env::var(ENV_RATE_LIMIT_WINDOW_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_WINDOW_SECS);
        Self::new(max, Duration::from_secs(secs))
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut state = self.state.lock().expect("rate limiter lock poisoned");
        let stamps = state.entry(key.to_string()).or_default();

        while let Some(front) = stamps.front() {
            if now.duration_since(*front) > self.window {
                stamps.pop_front();
            } else {
                break;
            }
        }

        if stamps.len() >= self.max_requests {
            return false;
        }
        stamps.push_back(now);
        true
    }
}

impl RateLimit for SlidingWindowLimiter {
    fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }
}
