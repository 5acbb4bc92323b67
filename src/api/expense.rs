//! Expense handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::error::ApiError;
use super::routes::AppState;
use super::types::{
    ExpenseAddRequest, ExpenseAddResponse, ExpenseDeleteResponse, ExpenseListQuery,
    ExpenseListResponse,
};
use crate::budget::summarize;
use crate::ledger::Expense;

/// POST /api/expense/add. Validates the amount, appends the expense and
/// returns the fresh summary plus an alert when the category just blew its
/// limit.
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExpenseAddRequest>,
) -> Result<(StatusCode, Json<ExpenseAddResponse>), ApiError> {
    let user_id = request
        .user_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("user_id required"))?
        .to_string();

    let amount = request.amount.unwrap_or(0.0);
    if amount <= 0.0 {
        return Err(ApiError::validation("Amount must be > 0"));
    }

    let category = request.category.unwrap_or_else(|| "Other".to_string());
    let description = request.description.unwrap_or_default();
    let date = request.date;

    let (expense, alert, summary) = state
        .store
        .update(&user_id, move |ledger| {
            let expense = Expense::new(category, amount, description, date);
            ledger.expenses.push(expense.clone());

            let summary = summarize(ledger);
            let category_spent = summary
                .spending_by_category
                .get(&expense.category)
                .copied()
                .unwrap_or(0.0);
            let alert = match ledger.budget_limits.get(&expense.category) {
                Some(&limit) if limit != 0.0 && category_spent > limit => Some(format!(
                    "⚠️ Over budget '{}': {} {:.2} / {:.2}",
                    expense.category, ledger.currency, category_spent, limit
                )),
                _ => None,
            };
            (expense, alert, summary)
        })
        .await;

    tracing::info!(
        user_id = %user_id,
        expense_id = %expense.expense_id,
        category = %expense.category,
        amount = expense.amount,
        over_budget = alert.is_some(),
        "Expense added"
    );
    Ok((
        StatusCode::CREATED,
        Json(ExpenseAddResponse {
            message: "Added.",
            expense,
            alert,
            summary,
        }),
    ))
}

/// GET /api/expense/:uid/list, optionally filtered by `?category=` with
/// case-insensitive matching.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<ExpenseListQuery>,
) -> Json<ExpenseListResponse> {
    let ledger = state.store.snapshot(&user_id).await;
    let expenses: Vec<Expense> = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => {
            let wanted = category.to_lowercase();
            ledger
                .expenses
                .into_iter()
                .filter(|expense| expense.category.to_lowercase() == wanted)
                .collect()
        }
        None => ledger.expenses,
    };
    let count = expenses.len();
    Json(ExpenseListResponse { expenses, count })
}

/// DELETE /api/expense/:uid/:eid.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path((user_id, expense_id)): Path<(String, String)>,
) -> Result<Json<ExpenseDeleteResponse>, ApiError> {
    let expense_id = match Uuid::parse_str(&expense_id) {
        Ok(id) => id,
        // a malformed id can't match any stored expense
        Err(_) => return Err(ApiError::NotFound),
    };

    let summary = state
        .store
        .update(&user_id, |ledger| {
            let before = ledger.expenses.len();
            ledger.expenses.retain(|e| e.expense_id != expense_id);
            if ledger.expenses.len() == before {
                None
            } else {
                Some(summarize(ledger))
            }
        })
        .await
        .ok_or(ApiError::NotFound)?;

    tracing::info!(user_id = %user_id, expense_id = %expense_id, "Expense deleted");
    Ok(Json(ExpenseDeleteResponse {
        message: "Deleted.",
        summary,
    }))
}
