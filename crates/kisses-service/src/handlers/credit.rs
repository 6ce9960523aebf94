//! Credit ledger handlers: balance reads and generation transfers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use kisses_core::AccountId;
use kisses_store::Ledger;

use crate::error::ApiError;
use crate::state::AppState;

/// Balance query parameters.
#[derive(Debug, Deserialize)]
pub struct CreditQuery {
    /// Account to read, or `/` for the creator leaderboard.
    pub user_id: Option<String>,
}

/// Single-account balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current kiss balance.
    pub kisses: i64,
}

/// Read a balance, lazily granting the welcome amount on first touch.
///
/// The special `user_id=/` returns every creator/model account and its
/// balance as one object, highest balance first.
pub async fn get_credit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreditQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(user_id) = query.user_id else {
        return Err(ApiError::BadRequest("Missing user_id".into()));
    };

    if user_id == "/" {
        let balances = state.ledger.list_attributed_balances().await?;
        let mut body = serde_json::Map::new();
        for (account, kisses) in balances {
            body.insert(account.storage_key(), kisses.into());
        }
        return Ok(Json(serde_json::Value::Object(body)));
    }

    let account: AccountId = user_id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid user_id: {e}")))?;

    let kisses = state.ledger.get_or_init_balance(&account).await?;

    Ok(Json(serde_json::json!(BalanceResponse { kisses })))
}

/// Generation charge request from the trusted backend.
#[derive(Debug, Deserialize)]
pub struct ChargeRequest {
    /// Shared secret held by the trusted backend.
    pub admin_secret: Option<String>,
    /// Preset author receiving the reward.
    pub model_creator: Option<String>,
    /// Model slug of the preset.
    pub model_name: Option<String>,
    /// Consumer wallet address being debited.
    pub user_address: Option<String>,
    /// Reverse a prior charge instead (compensation for a generation that
    /// failed after its charge committed).
    #[serde(default)]
    pub refund: bool,
}

/// Charge response.
#[derive(Debug, Serialize)]
pub struct ChargeResponse {
    /// Always true on a committed transfer.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// Atomically move kisses for one generation: consumer pays the cost, the
/// preset's creator earns the reward.
///
/// Authorization is a coarse shared-secret check; only the trusted compute
/// backend holds the secret. The secret is verified before any field
/// validation or ledger access.
pub async fn charge_generation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChargeRequest>,
) -> Result<Json<ChargeResponse>, ApiError> {
    let expected = state
        .config
        .admin_secret
        .as_deref()
        .ok_or(ApiError::Unauthorized)?;
    if body.admin_secret.as_deref() != Some(expected) {
        return Err(ApiError::Unauthorized);
    }

    let (Some(creator), Some(model), Some(address)) =
        (body.model_creator, body.model_name, body.user_address)
    else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };
    if creator.is_empty() || model.is_empty() || address.is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    }

    let consumer = AccountId::consumer(address)
        .map_err(|e| ApiError::BadRequest(format!("Invalid user_address: {e}")))?;
    let creator = AccountId::creator_model(creator, model)
        .map_err(|e| ApiError::BadRequest(format!("Invalid creator/model: {e}")))?;

    let message = if body.refund {
        state.ledger.refund_generation(&consumer, &creator).await?;
        tracing::info!(consumer = %consumer, creator = %creator, "Generation charge refunded");
        "Refund successful"
    } else {
        state
            .ledger
            .transfer_on_generation(&consumer, &creator)
            .await?;
        tracing::info!(consumer = %consumer, creator = %creator, "Generation charged");
        "Transaction successful"
    };

    Ok(Json(ChargeResponse {
        success: true,
        message: message.to_string(),
    }))
}
