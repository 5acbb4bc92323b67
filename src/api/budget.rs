//! Budget limit, savings and dashboard handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use super::error::ApiError;
use super::routes::AppState;
use super::types::{
    DashboardResponse, SavingsUpdateRequest, SavingsUpdateResponse, SetLimitsRequest,
    SetLimitsResponse,
};
use crate::budget::{health_score, summarize, top_categories};

/// POST /api/budget/set-limits. Merges the supplied limits into the user's
/// existing ones and echoes the full set.
pub async fn set_limits(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetLimitsRequest>,
) -> Result<Json<SetLimitsResponse>, ApiError> {
    let user_id = request
        .user_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("user_id required"))?;

    let limits = state
        .store
        .update(user_id, |ledger| {
            for (category, limit) in &request.limits {
                ledger.budget_limits.insert(category.clone(), *limit);
            }
            ledger.budget_limits.clone()
        })
        .await;

    tracing::info!(user_id = %user_id, limit_count = limits.len(), "Budget limits updated");
    Ok(Json(SetLimitsResponse {
        message: "Updated.",
        limits,
    }))
}

/// POST /api/savings/update. Only the fields present in the body change.
pub async fn update_savings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SavingsUpdateRequest>,
) -> Result<Json<SavingsUpdateResponse>, ApiError> {
    let user_id = request
        .user_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("user_id required"))?;

    let summary = state
        .store
        .update(user_id, |ledger| {
            if let Some(saved) = request.savings_saved {
                ledger.savings_saved = saved;
            }
            if let Some(goal) = request.savings_goal {
                ledger.savings_goal = goal;
            }
            summarize(ledger)
        })
        .await;

    Ok(Json(SavingsUpdateResponse {
        message: "Updated.",
        summary,
    }))
}

/// GET /api/dashboard/:uid. Summary, health score and the top five spending
/// categories in one response.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<DashboardResponse> {
    let ledger = state.store.snapshot(&user_id).await;
    let summary = summarize(&ledger);
    let health = health_score(&summary);

    Json(DashboardResponse {
        top_categories: top_categories(&summary, 5),
        financial_health_score: health.score,
        health_label: health.label,
        total_expenses_count: ledger.expenses.len(),
        summary,
    })
}
