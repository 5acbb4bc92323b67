//! AI-backed handlers: chat, analysis, recommendations, forecast, key check.
//!
//! All of them answer 503 with setup instructions when no provider key was
//! configured, and map dispatcher failures to friendly 500s.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use super::error::ApiError;
use super::routes::AppState;
use super::types::{
    AnalyzeRequest, AnalyzeResponse, ChatRequest, ChatResponse, ForecastRequest, ForecastResponse,
    KeyCheckResponse, RecommendationQuery,
};
use crate::budget::{round2, summarize};
use crate::llm::{AiService, ChatTurn};
use crate::prompt;

/// Stored turns replayed to the provider per chat call.
const CHAT_REPLAY_TURNS: usize = 20;

fn ai_service(state: &AppState) -> Result<&AiService, ApiError> {
    state.ai.as_deref().ok_or(ApiError::AiUnavailable)
}

/// GET /api/check-key. Always 200; `valid` tells the frontend whether AI
/// features will work.
pub async fn check_key(State(state): State<Arc<AppState>>) -> Json<KeyCheckResponse> {
    match &state.ai {
        Some(ai) => Json(KeyCheckResponse {
            valid: true,
            model: Some(ai.model().to_string()),
            message: None,
        }),
        None => Json(KeyCheckResponse {
            valid: false,
            model: None,
            message: Some("Add GEMINI_API_KEY to the environment and restart."),
        }),
    }
}

/// POST /api/chat. The first message of a conversation is prefixed with the
/// system prompt; later ones replay the last stored turns instead.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let ai = ai_service(&state)?;

    let user_id = request.user_id.as_deref().filter(|id| !id.is_empty());
    let message = request.message.as_deref().map(str::trim).unwrap_or("");
    let (user_id, message) = match (user_id, message) {
        (Some(id), text) if !text.is_empty() => (id, text),
        _ => return Err(ApiError::validation("user_id and message required")),
    };

    let ledger = state.store.snapshot(user_id).await;
    let start = ledger.chat_history.len().saturating_sub(CHAT_REPLAY_TURNS);
    let history = &ledger.chat_history[start..];

    let outgoing = if history.is_empty() {
        let summary = summarize(&ledger);
        format!(
            "{}\n\nUser: {}",
            prompt::system_prompt(&ledger.name, &summary),
            message
        )
    } else {
        message.to_string()
    };

    let reply = ai.chat(history, &outgoing).await?;

    let reply_turn = reply.clone();
    state
        .store
        .update(user_id, move |ledger| {
            ledger.chat_history.push(ChatTurn::user(outgoing));
            ledger.chat_history.push(ChatTurn::model(reply_turn));
        })
        .await;

    tracing::info!(user_id = %user_id, "Chat reply delivered");
    Ok(Json(ChatResponse {
        reply,
        user_id: user_id.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// POST /api/analyze/:uid with an optional `{"focus": ...}` body.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    body: Option<Json<AnalyzeRequest>>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let ai = ai_service(&state)?;
    let focus = body
        .and_then(|Json(request)| request.focus)
        .unwrap_or_else(|| "general".to_string());

    let ledger = state.store.snapshot(&user_id).await;
    let summary = summarize(&ledger);
    let system = prompt::system_prompt(&ledger.name, &summary);

    let analysis = ai.generate(&prompt::analysis_prompt(&system, &focus)).await?;
    tracing::info!(user_id = %user_id, focus = %focus, "Spending analysis generated");
    Ok(Json(AnalyzeResponse {
        analysis,
        summary,
        focus,
    }))
}

/// GET /api/recommendations/:uid?type=home|party|jewelry|general.
///
/// The model is asked for a JSON array; when its output parses, the parsed
/// value is returned under `recommendations`, otherwise the raw text comes
/// back under `recommendations_text`.
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Value>, ApiError> {
    let ai = ai_service(&state)?;
    let rec_type = query.rec_type.unwrap_or_else(|| "general".to_string());

    let ledger = state.store.snapshot(&user_id).await;
    let summary = summarize(&ledger);
    let system = prompt::system_prompt(&ledger.name, &summary);

    let text = ai
        .generate(&prompt::recommendations_prompt(
            &system,
            &rec_type,
            &ledger.currency,
            summary.remaining_balance,
        ))
        .await?;

    let body = match prompt::extract_json(&text) {
        Some(recommendations) => json!({
            "recommendations": recommendations,
            "type": rec_type,
        }),
        None => json!({
            "recommendations_text": text,
            "type": rec_type,
        }),
    };
    Ok(Json(body))
}

/// POST /api/forecast/:uid. Projects the month's spending from the elapsed
/// days and asks the model for a short assessment of the numbers.
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    body: Option<Json<ForecastRequest>>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let ai = ai_service(&state)?;
    let (days_elapsed, total_days) = match body {
        Some(Json(request)) => (
            request.days_elapsed.unwrap_or(15),
            request.total_days.unwrap_or(30),
        ),
        None => (15, 30),
    };

    let ledger = state.store.snapshot(&user_id).await;
    let summary = summarize(&ledger);
    let spent = summary.total_spent;
    let daily_avg = if days_elapsed > 0 {
        spent / days_elapsed as f64
    } else {
        0.0
    };
    let projected = daily_avg * total_days as f64;

    let system = prompt::system_prompt(&ledger.name, &summary);
    let assessment = ai
        .generate(&prompt::forecast_prompt(
            &system,
            &ledger.currency,
            spent,
            days_elapsed,
            projected,
        ))
        .await?;

    Ok(Json(ForecastResponse {
        days_elapsed,
        spent_so_far: round2(spent),
        daily_avg_spend: round2(daily_avg),
        projected_monthly_spend: round2(projected),
        projected_monthly_savings: round2(summary.monthly_income - projected),
        ai_assessment: assessment,
    }))
}
