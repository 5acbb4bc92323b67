//! Google Gemini provider over the generateContent REST API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ChatRole, ChatTurn, LlmError, TextGenerator};
use crate::config::Config;

/// Models in preference order; the first has the highest free-tier quota.
pub const MODEL_PRIORITY: [&str; 5] = [
    "gemini-1.5-flash",
    "gemini-1.5-flash-latest",
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash",
    "gemini-1.0-pro",
];

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini text-generation client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the configured model, defaulting to the head of
    /// [`MODEL_PRIORITY`]. No network traffic happens until the first call.
    pub fn new(config: &Config) -> Self {
        let model = config
            .model_override
            .clone()
            .unwrap_or_else(|| MODEL_PRIORITY[0].to_string());
        Self {
            client: reqwest::Client::new(),
            api_key: config.gemini_api_key.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        }
    }

    /// Convert a stored turn to the request wire shape.
    fn content_from_turn(turn: &ChatTurn) -> Value {
        let role = match turn.role {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        };
        let parts: Vec<Value> = turn
            .parts
            .iter()
            .map(|text| json!({ "text": text }))
            .collect();
        json!({ "role": role, "parts": parts })
    }

    async fn generate_content(&self, contents: Vec<Value>) -> Result<String, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = json!({ "contents": contents });

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Keep the raw body: it carries the quota/auth markers the
            // dispatcher classifies on.
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e)))?;
        parsed.first_text()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let contents = vec![Self::content_from_turn(&ChatTurn::user(prompt))];
        self.generate_content(contents).await
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, LlmError> {
        let mut contents: Vec<Value> = history.iter().map(Self::content_from_turn).collect();
        contents.push(Self::content_from_turn(&ChatTurn::user(message)));
        self.generate_content(contents).await
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts.
    fn first_text(&self) -> Result<String, LlmError> {
        let content = self
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .ok_or_else(|| LlmError::Parse("No candidates in response".to_string()))?;
        if content.parts.is_empty() {
            return Err(LlmError::Parse("Candidate contained no text".to_string()));
        }
        Ok(content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect())
    }
}
