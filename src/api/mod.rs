//! HTTP API for the PocketSmart backend.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Service health and active model
//! - `GET  /api/check-key` - Whether a usable provider key is configured
//! - `POST /api/user/setup` - Create or update a user profile
//! - `GET  /api/user/{uid}/profile` - Full profile, created on first touch
//! - `DELETE /api/user/{uid}/reset` - Drop a user's ledger
//! - `POST /api/expense/add` - Record an expense
//! - `GET  /api/expense/{uid}/list` - List expenses, optional category filter
//! - `DELETE /api/expense/{uid}/{eid}` - Delete one expense
//! - `POST /api/budget/set-limits` - Merge per-category spending limits
//! - `POST /api/savings/update` - Update savings progress or goal
//! - `GET  /api/dashboard/{uid}` - Summary, health score, top categories
//! - `POST /api/chat` - Budget-aware AI chat
//! - `POST /api/analyze/{uid}` - AI spending analysis
//! - `GET  /api/recommendations/{uid}` - Themed AI shopping recommendations
//! - `POST /api/forecast/{uid}` - Spending projection with AI assessment

mod ai;
mod budget;
mod error;
mod expense;
pub mod routes;
pub mod types;
mod user;

pub use error::ApiError;
pub use routes::serve;
