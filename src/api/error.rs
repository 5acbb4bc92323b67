//! Error-to-response mapping for the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::llm::AiError;

/// Setup instructions returned when AI endpoints run without a provider key.
const KEY_SETUP_MESSAGE: &str = "Gemini API key not configured.\n\n\
1. Go to https://aistudio.google.com/app/apikey\n\
2. Create a free API key\n\
3. Set GEMINI_API_KEY in the environment\n\
4. Restart the server";

/// Failures a handler can answer with. Every variant renders as
/// `{"error": "..."}` with its status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found")]
    NotFound,

    /// No usable provider key was configured at startup.
    #[error("AI provider not configured")]
    AiUnavailable,

    #[error(transparent)]
    Ai(#[from] AiError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::AiUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Ai(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing error copy.
    fn message(&self) -> String {
        match self {
            ApiError::Validation(message) => message.clone(),
            ApiError::NotFound => "Not found".to_string(),
            ApiError::AiUnavailable => KEY_SETUP_MESSAGE.to_string(),
            ApiError::Ai(AiError::QuotaExceeded) => {
                "quota_exceeded: Free-tier rate limit reached (15 req/min). \
                 Please wait ~60 seconds and try again."
                    .to_string()
            }
            ApiError::Ai(AiError::InvalidApiKey) => {
                "API key is invalid. Check your GEMINI_API_KEY — no spaces, no quotes around the key."
                    .to_string()
            }
            ApiError::Ai(AiError::Provider(detail)) => format!("AI error: {detail}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_variants() {
        assert_eq!(
            ApiError::validation("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::AiUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Ai(AiError::QuotaExceeded).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn quota_copy_tells_the_user_to_wait() {
        let message = ApiError::Ai(AiError::QuotaExceeded).message();
        assert!(message.starts_with("quota_exceeded:"));
        assert!(message.contains("wait ~60 seconds"));
    }

    #[test]
    fn missing_key_copy_includes_setup_steps() {
        let message = ApiError::AiUnavailable.message();
        assert!(message.starts_with("Gemini API key not configured."));
        assert!(message.contains("https://aistudio.google.com/app/apikey"));
    }

    #[test]
    fn provider_failures_keep_their_detail() {
        let message = ApiError::Ai(AiError::Provider("boom".to_string())).message();
        assert_eq!(message, "AI error: boom");
    }
}
