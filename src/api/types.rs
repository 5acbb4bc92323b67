//! Request and response bodies for the HTTP API.
//!
//! Response field names are the wire contract the frontend consumes; change
//! them and the dashboard breaks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::budget::{BudgetSummary, CategorySpend};
use crate::ledger::{Expense, UserLedger};

#[derive(Debug, Deserialize)]
pub struct UserSetupRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub monthly_income: Option<f64>,
    pub currency: Option<String>,
    pub savings_goal: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UserSetupResponse {
    pub message: &'static str,
    pub user_id: String,
    pub profile: UserLedger,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserLedger,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseAddRequest {
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseAddResponse {
    pub message: &'static str,
    pub expense: Expense,
    pub alert: Option<String>,
    pub summary: BudgetSummary,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ExpenseDeleteResponse {
    pub message: &'static str,
    pub summary: BudgetSummary,
}

#[derive(Debug, Deserialize)]
pub struct SetLimitsRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub limits: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct SetLimitsResponse {
    pub message: &'static str,
    pub limits: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct SavingsUpdateRequest {
    pub user_id: Option<String>,
    pub savings_saved: Option<f64>,
    pub savings_goal: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SavingsUpdateResponse {
    pub message: &'static str,
    pub summary: BudgetSummary,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub summary: BudgetSummary,
    pub top_categories: Vec<CategorySpend>,
    pub financial_health_score: i64,
    pub health_label: &'static str,
    pub total_expenses_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub user_id: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub focus: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    pub summary: BudgetSummary,
    pub focus: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(rename = "type")]
    pub rec_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub days_elapsed: Option<i64>,
    pub total_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub days_elapsed: i64,
    pub spent_so_far: f64,
    pub daily_avg_spend: f64,
    pub projected_monthly_spend: f64,
    pub projected_monthly_savings: f64,
    pub ai_assessment: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct KeyCheckResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}
