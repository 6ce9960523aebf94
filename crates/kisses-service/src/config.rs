//! Service configuration.

use kisses_core::KissAmounts;

/// Default Together-compatible API base URL.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.together.xyz";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the SQLite ledger database (default: "kisses.db").
    pub database_path: String,

    /// Shared secret gating the transfer endpoint. Transfers are rejected
    /// outright when unset.
    pub admin_secret: Option<String>,

    /// Together-compatible API base URL.
    pub provider_base_url: String,

    /// Server-held provider API key. Callers may supply their own instead.
    pub provider_api_key: Option<String>,

    /// Unauthenticated requests allowed per identity per window. Zero
    /// disables rate limiting.
    pub rate_limit_requests: u32,

    /// Rate-limit window in minutes (default: 1440, one day).
    pub rate_limit_window_minutes: u64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Fixed kiss amounts for the ledger.
    pub amounts: KissAmounts,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "kisses.db".into()),
            admin_secret: std::env::var("ADMIN_SECRET").ok(),
            provider_base_url: std::env::var("PROVIDER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_URL.into()),
            provider_api_key: std::env::var("PROVIDER_API_KEY").ok(),
            rate_limit_requests: std::env::var("RATE_LIMIT_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            rate_limit_window_minutes: std::env::var("RATE_LIMIT_WINDOW_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
            amounts: KissAmounts::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_path: "kisses.db".into(),
            admin_secret: None,
            provider_base_url: DEFAULT_PROVIDER_URL.into(),
            provider_api_key: None,
            rate_limit_requests: 10,
            rate_limit_window_minutes: 1440,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 120,
            amounts: KissAmounts::default(),
        }
    }
}
