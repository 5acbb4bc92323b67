//! User profile handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use super::routes::AppState;
use super::types::{MessageResponse, ProfileResponse, UserSetupRequest, UserSetupResponse};

/// POST /api/user/setup. Creates the user if needed and overwrites whatever
/// fields the body carries; a missing user_id gets a generated one.
pub async fn setup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UserSetupRequest>,
) -> Json<UserSetupResponse> {
    let user_id = request
        .user_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let profile = state
        .store
        .update(&user_id, |ledger| {
            if let Some(income) = request.monthly_income {
                ledger.monthly_income = income;
            }
            if let Some(currency) = request.currency {
                ledger.currency = currency;
            }
            if let Some(goal) = request.savings_goal {
                ledger.savings_goal = goal;
            }
            if let Some(name) = request.name {
                ledger.name = name;
            }
            ledger.clone()
        })
        .await;

    tracing::info!(user_id = %user_id, "User profile saved");
    Json(UserSetupResponse {
        message: "Saved.",
        user_id,
        profile,
    })
}

/// GET /api/user/:uid/profile.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<ProfileResponse> {
    let profile = state.store.snapshot(&user_id).await;
    Json(ProfileResponse { profile })
}

/// DELETE /api/user/:uid/reset. Succeeds whether or not the user existed.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<MessageResponse> {
    state.store.remove(&user_id).await;
    tracing::info!(user_id = %user_id, "User ledger reset");
    Json(MessageResponse { message: "Reset." })
}
