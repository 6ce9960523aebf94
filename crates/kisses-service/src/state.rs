//! Application state.

use std::sync::Arc;
use std::time::Duration;

use kisses_store::SqliteLedger;

use crate::config::ServiceConfig;
use crate::ratelimit::FixedWindowLimiter;
use crate::together::TogetherClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger store, constructed in `main` and injected here.
    pub ledger: Arc<SqliteLedger>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Together-compatible provider client.
    pub provider: Arc<TogetherClient>,

    /// Per-identity limiter for anonymous generation requests, when enabled.
    pub limiter: Option<FixedWindowLimiter>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(ledger: Arc<SqliteLedger>, config: ServiceConfig) -> Self {
        let provider = Arc::new(TogetherClient::new(
            &config.provider_base_url,
            config.provider_api_key.clone(),
        ));

        if config.provider_api_key.is_none() {
            tracing::warn!(
                "No provider API key configured - generation requires caller-supplied keys"
            );
        }

        let limiter = if config.rate_limit_requests == 0 {
            tracing::warn!("Rate limiting disabled - anonymous generation is unmetered");
            None
        } else {
            Some(FixedWindowLimiter::new(
                config.rate_limit_requests,
                Duration::from_secs(config.rate_limit_window_minutes * 60),
            ))
        };

        Self {
            ledger,
            config,
            provider,
            limiter,
        }
    }
}
