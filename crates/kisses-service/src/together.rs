//! Together-compatible provider client.
//!
//! Two upstream calls back the gateway: chat completions for optional
//! prompt refinement, and FLUX LoRA image generation. Callers may supply
//! their own API key per request; otherwise the server-held key is used.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Image model driving every preset.
pub const IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-dev-lora";

/// Text model used for prompt refinement.
pub const REFINER_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo";

/// Error type for provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-success status.
    #[error("provider API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for server-side logs only.
        body: String,
    },

    /// No API key available for this request.
    #[error("no provider API key configured and none supplied by caller")]
    MissingApiKey,

    /// The provider responded without image data.
    #[error("provider response contained no image data")]
    MissingImageData,
}

/// Parameters for one image generation call.
#[derive(Debug, Clone)]
pub struct ImageRequest<'a> {
    /// Final, trigger-decorated prompt.
    pub prompt: &'a str,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Diffusion steps.
    pub steps: u32,
    /// Seed for reproducibility.
    pub seed: u64,
    /// LoRA weights path.
    pub lora_path: &'a str,
    /// LoRA scale.
    pub lora_scale: f32,
}

/// One generated image as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Base64-encoded image payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    /// Hosted image URL, when the provider returns one instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Together-compatible API client.
#[derive(Debug, Clone)]
pub struct TogetherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TogetherClient {
    /// Create a new provider client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn effective_key<'a>(&'a self, key_override: Option<&'a str>) -> Result<&'a str, ProviderError> {
        key_override
            .or(self.api_key.as_deref())
            .ok_or(ProviderError::MissingApiKey)
    }

    /// Rewrite a prompt through the refinement model.
    ///
    /// Returns the refined prompt text, or the original prompt when the
    /// model responds without content.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects it;
    /// callers are expected to fall back to the unrefined prompt.
    pub async fn refine_prompt(
        &self,
        prompt: &str,
        instruction: &str,
        key_override: Option<&str>,
    ) -> Result<String, ProviderError> {
        let key = self.effective_key(key_override)?;
        let url = format!("{}/v1/chat/completions", self.base_url);

        let payload = serde_json::json!({
            "model": REFINER_MODEL,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "Your task is to help refine prompts that will be passed to an image \
                         generation model. {instruction}. Only respond with the improved prompt \
                         and nothing else. Be as terse as possible, do not include quotes."
                    ),
                },
                {
                    "role": "user",
                    "content": format!("Write a more detailed prompt about \"{prompt}\""),
                }
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {key}"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let refined = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| prompt.to_string());

        Ok(refined)
    }

    /// Generate one image.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the provider rejects it, or
    /// the response carries no image.
    pub async fn generate_image(
        &self,
        request: &ImageRequest<'_>,
        key_override: Option<&str>,
    ) -> Result<GeneratedImage, ProviderError> {
        let key = self.effective_key(key_override)?;
        let url = format!("{}/v1/images/generations", self.base_url);

        let payload = serde_json::json!({
            "model": IMAGE_MODEL,
            "prompt": request.prompt,
            "width": request.width,
            "height": request.height,
            "steps": request.steps,
            "seed": request.seed,
            "response_format": "base64",
            "image_loras": [{
                "path": request.lora_path,
                "scale": request.lora_scale,
            }]
        });

        tracing::debug!(prompt = %request.prompt, seed = request.seed, "Requesting image generation");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {key}"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let parsed: ImagesResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .ok_or(ProviderError::MissingImageData)
    }
}
