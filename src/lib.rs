//! PocketSmart AI backend.
//!
//! An axum service that keeps per-user budget ledgers in memory, computes
//! spending summaries and a financial health score from them, and feeds that
//! context to Google Gemini for chat, analysis, recommendation and forecast
//! endpoints. All outbound provider traffic funnels through one process-wide
//! rate limiter and a retrying dispatcher tuned for free-tier quotas.

pub mod api;
pub mod budget;
pub mod config;
pub mod ledger;
pub mod llm;
pub mod prompt;
pub mod store;
