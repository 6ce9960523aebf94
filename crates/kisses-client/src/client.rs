//! Kisses HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use kisses_core::AccountId;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, BalanceResponse, ChargeReceipt, ChargeRequest, CreatorBalance,
    GenerateRequest, GenerateResponse,
};

/// Kisses API client.
///
/// Provides balance reads, generation charges/refunds, and gateway calls
/// for the trusted compute backend.
#[derive(Debug, Clone)]
pub struct KissesClient {
    client: Client,
    base_url: String,
    admin_secret: String,
}

impl KissesClient {
    /// Create a new kisses client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the kisses service (e.g., `"http://kisses:8080"`)
    /// * `admin_secret` - Shared secret authorizing transfer calls
    #[must_use]
    pub fn new(base_url: impl Into<String>, admin_secret: impl Into<String>) -> Self {
        Self::with_options(base_url, admin_secret, ClientOptions::default())
    }

    /// Create a new kisses client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        admin_secret: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_secret: admin_secret.into(),
        }
    }

    /// Read a consumer's balance, lazily granting the welcome amount on
    /// first touch.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_balance(&self, user_address: &str) -> Result<i64, ClientError> {
        let url = format!("{}/credit", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("user_id", user_address)])
            .send()
            .await?;

        let balance: BalanceResponse = self.handle_response(response).await?;
        Ok(balance.kisses)
    }

    /// List every creator/model account and its balance, highest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_creator_balances(&self) -> Result<Vec<CreatorBalance>, ClientError> {
        let url = format!("{}/credit", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("user_id", "/")])
            .send()
            .await?;

        let body: serde_json::Map<String, serde_json::Value> =
            self.handle_response(response).await?;

        let mut balances = Vec::with_capacity(body.len());
        for (key, value) in body {
            // The server only lists composite keys; anything else is a
            // protocol mismatch worth surfacing.
            let Ok(AccountId::CreatorModel { creator, model }) = key.parse() else {
                return Err(ClientError::Api {
                    code: "bad_listing_key".into(),
                    message: format!("unexpected listing key: {key}"),
                    status: 200,
                });
            };
            balances.push(CreatorBalance {
                creator,
                model,
                kisses: value.as_i64().unwrap_or(0),
            });
        }
        Ok(balances)
    }

    /// Charge one generation: debit the consumer, reward the creator.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InsufficientKisses`] or
    /// [`ClientError::AccountNotFound`] on the corresponding domain
    /// failures, or a generic error otherwise.
    pub async fn charge_generation(
        &self,
        creator: &str,
        model: &str,
        user_address: &str,
    ) -> Result<ChargeReceipt, ClientError> {
        self.post_transfer(creator, model, user_address, false).await
    }

    /// Reverse a prior charge after a failed generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn refund_generation(
        &self,
        creator: &str,
        model: &str,
        user_address: &str,
    ) -> Result<ChargeReceipt, ClientError> {
        self.post_transfer(creator, model, user_address, true).await
    }

    /// Generate an image through the gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn generate_image(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ClientError> {
        let url = format!("{}/image", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;
        self.handle_response(response).await
    }

    /// Charge first, then generate, refunding the charge if generation
    /// fails.
    ///
    /// This is the backend's standard sequence: the consumer can neither
    /// get a free image nor pay for a generation that never happened.
    ///
    /// # Errors
    ///
    /// Returns the charge error if the charge fails, otherwise the
    /// generation error (after attempting the refund).
    pub async fn generate_charged(
        &self,
        request: &GenerateRequest,
        creator: &str,
        model: &str,
        user_address: &str,
    ) -> Result<GenerateResponse, ClientError> {
        self.charge_generation(creator, model, user_address).await?;

        match self.generate_image(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                if let Err(refund_err) = self.refund_generation(creator, model, user_address).await
                {
                    // The consumer paid for nothing; this needs an operator.
                    tracing::error!(
                        user_address = %user_address,
                        error = %refund_err,
                        "Refund after failed generation also failed"
                    );
                }
                Err(e)
            }
        }
    }

    async fn post_transfer(
        &self,
        creator: &str,
        model: &str,
        user_address: &str,
        refund: bool,
    ) -> Result<ChargeReceipt, ClientError> {
        let url = format!("{}/credit", self.base_url);
        let request = ChargeRequest {
            admin_secret: self.admin_secret.clone(),
            model_creator: creator.to_string(),
            model_name: model.to_string(),
            user_address: user_address.to_string(),
            refund,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                match code {
                    "insufficient_kisses" => {
                        let balance = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("balance"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);
                        let required = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("required"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);

                        Err(ClientError::InsufficientKisses { balance, required })
                    }
                    "account_not_found" => Err(ClientError::AccountNotFound {
                        account: message.replace("Account not found: ", ""),
                    }),
                    "rate_limited" => Err(ClientError::RateLimited(message)),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 120; generation is slow).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
        }
    }
}
