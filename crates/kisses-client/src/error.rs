//! Client error types.

/// Errors that can occur when using the kisses client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The consumer cannot afford the generation.
    #[error("insufficient kisses: balance={balance}, required={required}")]
    InsufficientKisses {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// The consumer has no balance row.
    #[error("account not found: {account}")]
    AccountNotFound {
        /// The account identifier.
        account: String,
    },

    /// Anonymous rate limit exhausted.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
