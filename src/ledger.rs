//! User ledgers and expense records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::ChatTurn;

/// A single spending record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub description: String,
    /// Date the money was spent (YYYY-MM-DD), kept as the client sent it.
    pub date: String,
    pub added_at: DateTime<Utc>,
}

impl Expense {
    /// New record with a fresh id; `date` falls back to today.
    pub fn new(category: String, amount: f64, description: String, date: Option<String>) -> Self {
        Self {
            expense_id: Uuid::new_v4(),
            category,
            amount,
            description,
            date: date.unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string()),
            added_at: Utc::now(),
        }
    }
}

/// Everything the service knows about one user.
///
/// Serialized whole as the `profile` object on the user endpoints, so field
/// names here are the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLedger {
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub monthly_income: f64,
    pub currency: String,
    pub expenses: Vec<Expense>,
    pub savings_goal: f64,
    pub savings_saved: f64,
    /// Per-category spending caps. A BTreeMap keeps summary output stable
    /// across runs.
    pub budget_limits: BTreeMap<String, f64>,
    pub chat_history: Vec<ChatTurn>,
}

impl UserLedger {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: "User".to_string(),
            created_at: Utc::now(),
            monthly_income: 0.0,
            currency: "USD".to_string(),
            expenses: Vec::new(),
            savings_goal: 0.0,
            savings_saved: 0.0,
            budget_limits: BTreeMap::new(),
            chat_history: Vec::new(),
        }
    }
}
