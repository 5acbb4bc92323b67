//! Outbound AI provider layer.
//!
//! This module provides a trait-based abstraction over text-generation
//! providers, with Google Gemini as the primary implementation, plus the
//! rate limiter and retrying dispatcher every provider call goes through.

mod dispatch;
mod error;
mod gemini;
mod throttle;

pub use dispatch::{retry_backoff, AiError, AiService, Dispatcher};
pub use error::LlmError;
pub use gemini::{GeminiClient, MODEL_PRIORITY};
pub use throttle::RateLimiter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One conversational turn, in the provider's wire shape.
///
/// Turns are stored verbatim in user profiles and replayed on later chat
/// calls, so this type doubles as the persistence format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub parts: Vec<String>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![text.into()],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            parts: vec![text.into()],
        }
    }
}

/// Trait for text-generation providers.
///
/// # Invariants
///
/// - Implementations perform exactly one provider request per call; retries
///   and rate limiting belong to the [`Dispatcher`] layered on top.
/// - `chat` must send `history` unchanged before the new message, oldest
///   turn first.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier of the underlying model.
    fn model(&self) -> &str;

    /// One-shot completion for a standalone prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Continue a conversation: replay `history`, then send `message` as the
    /// next user turn.
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, LlmError>;
}
