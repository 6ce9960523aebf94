//! Request and response types for the kisses client.

use serde::{Deserialize, Serialize};

/// Single-account balance response.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// Current kiss balance.
    pub kisses: i64,
}

/// One creator/model account and its accrued reward balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorBalance {
    /// The preset author.
    pub creator: String,
    /// The model slug.
    pub model: String,
    /// Accrued kisses.
    pub kisses: i64,
}

/// Body for `POST /credit`.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    /// Shared admin secret.
    pub admin_secret: String,
    /// Preset author receiving the reward.
    pub model_creator: String,
    /// Model slug of the preset.
    pub model_name: String,
    /// Consumer wallet address being debited.
    pub user_address: String,
    /// Reverse a prior charge instead.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub refund: bool,
}

/// Receipt for a committed charge or refund.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeReceipt {
    /// Always true on success.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// Body for `POST /image`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Free-text prompt.
    pub prompt: String,
    /// Style preset model slug.
    pub lora: String,
    /// Seed for reproducibility.
    pub seed: u64,
    /// Caller-supplied provider API key, if any.
    #[serde(rename = "userAPIKey", skip_serializing_if = "Option::is_none")]
    pub user_api_key: Option<String>,
}

impl GenerateRequest {
    /// Build a generation request without a caller-supplied key.
    #[must_use]
    pub fn new(prompt: impl Into<String>, lora: impl Into<String>, seed: u64) -> Self {
        Self {
            prompt: prompt.into(),
            lora: lora.into(),
            seed,
            user_api_key: None,
        }
    }
}

/// Response from `POST /image`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// The final prompt the image model saw.
    pub prompt: String,
    /// The provider's image payload (base64 or URL form).
    pub image: serde_json::Value,
}

/// Error envelope returned by the service.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// The error body.
    pub error: ApiErrorBody,
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Stable machine code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    pub details: Option<serde_json::Value>,
}
