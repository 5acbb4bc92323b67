//! Budget aggregation: spending summaries, health scoring, top categories.
//!
//! Everything here is pure computation over a [`UserLedger`] snapshot, so a
//! summary is fully determined by the ledger state it was built from.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

use crate::ledger::UserLedger;

/// A category whose spending exceeds its configured limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetViolation {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub over_by: f64,
}

/// Aggregated view of a ledger, as returned on most API responses.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSummary {
    pub monthly_income: f64,
    pub total_spent: f64,
    pub remaining_balance: f64,
    pub spending_by_category: HashMap<String, f64>,
    pub budget_violations: Vec<BudgetViolation>,
    pub savings_goal: f64,
    pub savings_saved: f64,
    pub savings_progress_pct: f64,
    pub currency: String,
    /// Categories in first-seen expense order; breaks spending ties in
    /// [`top_categories`] deterministically.
    #[serde(skip)]
    category_order: Vec<String>,
}

/// Health score plus its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthScore {
    pub score: i64,
    pub label: &'static str,
}

/// One row of the dashboard's top-spending list.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub amount: f64,
}

/// Recompute the budget summary from the ledger's expenses, limits and
/// savings fields.
pub fn summarize(ledger: &UserLedger) -> BudgetSummary {
    let mut total_spent = 0.0;
    let mut spending_by_category: HashMap<String, f64> = HashMap::new();
    let mut category_order: Vec<String> = Vec::new();

    for expense in &ledger.expenses {
        total_spent += expense.amount;
        match spending_by_category.entry(expense.category.clone()) {
            Entry::Occupied(mut entry) => *entry.get_mut() += expense.amount,
            Entry::Vacant(entry) => {
                category_order.push(expense.category.clone());
                entry.insert(expense.amount);
            }
        }
    }

    let mut budget_violations = Vec::new();
    for (category, &limit) in &ledger.budget_limits {
        let spent = spending_by_category.get(category).copied().unwrap_or(0.0);
        if spent > limit {
            budget_violations.push(BudgetViolation {
                category: category.clone(),
                limit,
                spent,
                over_by: round2(spent - limit),
            });
        }
    }

    let goal = ledger.savings_goal;
    let saved = ledger.savings_saved;
    BudgetSummary {
        monthly_income: ledger.monthly_income,
        total_spent: round2(total_spent),
        remaining_balance: round2(ledger.monthly_income - total_spent),
        spending_by_category,
        budget_violations,
        savings_goal: goal,
        savings_saved: saved,
        savings_progress_pct: if goal > 0.0 {
            round1(saved / goal * 100.0)
        } else {
            0.0
        },
        currency: ledger.currency.clone(),
        category_order,
    }
}

/// Score the summary on the 10..=100 scale.
///
/// Without income there is nothing to judge against and the score stays 100.
/// Otherwise the spend/income ratio picks the base band (strictly-greater
/// thresholds at 1.0, 0.9, 0.7 and 0.5) and each budget violation subtracts
/// 15 points, floored at 10.
pub fn health_score(summary: &BudgetSummary) -> HealthScore {
    let mut score: i64 = 100;
    if summary.monthly_income > 0.0 {
        let ratio = summary.total_spent / summary.monthly_income;
        score = if ratio > 1.0 {
            10
        } else if ratio > 0.9 {
            30
        } else if ratio > 0.7 {
            55
        } else if ratio > 0.5 {
            75
        } else {
            95
        };
        let violations = summary.budget_violations.len() as i64;
        if violations > 0 {
            score = (score - 15 * violations).max(10);
        }
    }
    let label = if score >= 90 {
        "Excellent"
    } else if score >= 70 {
        "Good"
    } else if score >= 50 {
        "Fair"
    } else {
        "Poor"
    };
    HealthScore { score, label }
}

/// The `limit` highest-spending categories, largest first. Ties keep the
/// order in which the categories first appeared in the ledger.
pub fn top_categories(summary: &BudgetSummary, limit: usize) -> Vec<CategorySpend> {
    let mut rows: Vec<CategorySpend> = summary
        .category_order
        .iter()
        .map(|category| CategorySpend {
            category: category.clone(),
            amount: summary
                .spending_by_category
                .get(category)
                .copied()
                .unwrap_or(0.0),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(limit);
    rows
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
