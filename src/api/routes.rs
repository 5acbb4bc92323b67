//! Router assembly and serve loop.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::types::HealthResponse;
use super::{ai, budget, expense, user};
use crate::config::Config;
use crate::llm::AiService;
use crate::store::SharedLedgerStore;

/// Shared application state injected into every handler.
pub struct AppState {
    pub config: Config,
    pub store: SharedLedgerStore,
    /// None when no usable provider key was configured; AI endpoints then
    /// answer 503.
    pub ai: Option<Arc<AiService>>,
}

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/check-key", get(ai::check_key))
        .route("/api/user/setup", post(user::setup))
        .route("/api/user/:uid/profile", get(user::profile))
        .route("/api/user/:uid/reset", delete(user::reset))
        .route("/api/expense/add", post(expense::add))
        .route("/api/expense/:uid/list", get(expense::list))
        .route("/api/expense/:uid/:eid", delete(expense::remove))
        .route("/api/budget/set-limits", post(budget::set_limits))
        .route("/api/savings/update", post(budget::update_savings))
        .route("/api/dashboard/:uid", get(budget::dashboard))
        .route("/api/chat", post(ai::chat))
        .route("/api/analyze/:uid", post(ai::analyze))
        .route("/api/recommendations/:uid", get(ai::recommendations))
        .route("/api/forecast/:uid", post(ai::forecast))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model: state
            .ai
            .as_ref()
            .map(|ai| ai.model().to_string())
            .unwrap_or_default(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

/// Bind the configured address and serve until the process stops.
pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "PocketSmart backend listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
