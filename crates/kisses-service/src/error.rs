//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::together::ProviderError;

/// API error type.
///
/// Domain failures carry distinct stable codes so the trusted backend can
/// tell an out-of-kisses consumer from a missing account or an outage.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid shared secret.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource not found (e.g. unknown style preset).
    #[error("not found: {0}")]
    NotFound(String),

    /// The consumer has no balance row.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// The debit would take the consumer below zero.
    #[error("insufficient kisses: balance={balance}, required={required}")]
    InsufficientKisses {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Anonymous rate limit exhausted.
    #[error("rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Image or refinement provider failed.
    #[error("upstream provider error: {0}")]
    Upstream(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
                None,
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::AccountNotFound(account) => (
                StatusCode::NOT_FOUND,
                "account_not_found",
                format!("Account not found: {account}"),
                None,
            ),
            Self::InsufficientKisses { balance, required } => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_kisses",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "No requests left. Please add your own API key or try again in 24h.".to_string(),
                None,
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            Self::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    "Image provider request failed".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<kisses_store::StoreError> for ApiError {
    fn from(err: kisses_store::StoreError) -> Self {
        match err {
            kisses_store::StoreError::AccountNotFound { account } => Self::AccountNotFound(account),
            kisses_store::StoreError::InsufficientKisses { balance, required } => {
                Self::InsufficientKisses { balance, required }
            }
            kisses_store::StoreError::CorruptKey { key } => {
                Self::Internal(format!("corrupt ledger key: {key}"))
            }
            kisses_store::StoreError::Database(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self::Upstream(err.to_string())
    }
}
