//! Image generation gateway handler.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use kisses_core::Lora;

use crate::error::ApiError;
use crate::ratelimit::client_identity;
use crate::state::AppState;
use crate::together::{GeneratedImage, ImageRequest};

/// Generation request.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Free-text prompt.
    pub prompt: String,
    /// Style preset model slug.
    pub lora: String,
    /// Seed for reproducibility.
    pub seed: u64,
    /// Caller-supplied provider API key; exempts the request from the
    /// anonymous rate limit.
    #[serde(rename = "userAPIKey")]
    pub user_api_key: Option<String>,
}

/// Generation response.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// The final prompt actually sent to the image model, refinement and
    /// trigger text applied.
    pub prompt: String,
    /// The provider's image payload.
    pub image: GeneratedImage,
}

/// Generate one image with the requested style preset.
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    // Anonymous callers are metered; a caller key bypasses the limiter.
    if body.user_api_key.is_none() {
        if let Some(limiter) = &state.limiter {
            let identity = client_identity(&headers);
            if !limiter.check(&identity) {
                tracing::debug!(identity = %identity, "Anonymous rate limit exhausted");
                return Err(ApiError::RateLimited);
            }
        }
    }

    let lora =
        Lora::find(&body.lora).ok_or_else(|| ApiError::NotFound(format!("Missing lora: {}", body.lora)))?;

    let key_override = body.user_api_key.as_deref();

    // Refinement is best-effort: any upstream failure falls back to the
    // caller's prompt, still trigger-decorated.
    let final_prompt = match lora.refinement {
        None => lora.apply_trigger(&body.prompt),
        Some(instruction) => {
            match state
                .provider
                .refine_prompt(&body.prompt, instruction, key_override)
                .await
            {
                Ok(refined) => lora.apply_trigger(&refined),
                Err(e) => {
                    tracing::warn!(error = %e, lora = %lora.model, "Prompt refinement failed, using original prompt");
                    lora.apply_trigger(&body.prompt)
                }
            }
        }
    };

    let image = state
        .provider
        .generate_image(
            &ImageRequest {
                prompt: &final_prompt,
                width: lora.width(),
                height: lora.height(),
                steps: lora.steps,
                seed: body.seed,
                lora_path: lora.path,
                lora_scale: lora.scale,
            },
            key_override,
        )
        .await?;

    Ok(Json(GenerateResponse {
        prompt: final_prompt,
        image,
    }))
}
