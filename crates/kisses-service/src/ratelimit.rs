//! Fixed-window rate limiting for anonymous generation requests.
//!
//! Requests without a caller-supplied provider key are metered per network
//! identity: a fixed number of requests per rolling window (10 per day by
//! default). The window state lives in-process; restarting the service
//! resets it, which is acceptable for an abuse brake on a free tier.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

/// Identity used when no forwarding header names the caller.
const FALLBACK_IDENTITY: &str = "0.0.0.0";

/// A fixed-window request counter keyed by caller identity.
#[derive(Debug, Clone)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    /// Create a limiter allowing `max_requests` per `window` per identity.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a request for `identity` and report whether it is allowed.
    ///
    /// # Panics
    ///
    /// Panics if the window map mutex is poisoned.
    #[must_use]
    pub fn check(&self, identity: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("limiter mutex poisoned");

        let window = windows.entry(identity.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Resolve the caller identity from proxy forwarding headers.
///
/// First hop of `x-forwarded-for`, then `x-real-ip`, then a fixed fallback
/// so completely anonymous traffic shares one bucket.
#[must_use]
pub fn client_identity(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .unwrap_or(FALLBACK_IDENTITY)
        .to_string()
}
