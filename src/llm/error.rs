//! Provider error type and classification.

use thiserror::Error;

/// Failure of a single provider request.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl LlmError {
    /// Whether this failure means the provider's quota is exhausted and the
    /// call is worth retrying after a pause.
    ///
    /// Gemini signals this as HTTP 429, a "quota" mention in the error body,
    /// or a RESOURCE_EXHAUSTED status string; any one of them counts.
    pub fn is_quota(&self) -> bool {
        match self {
            LlmError::Api { status, message } => {
                *status == 429
                    || message.to_lowercase().contains("quota")
                    || message.contains("RESOURCE_EXHAUSTED")
            }
            _ => false,
        }
    }

    /// Whether the provider rejected the configured API key.
    pub fn is_invalid_key(&self) -> bool {
        match self {
            LlmError::Api { message, .. } => {
                message.contains("API_KEY_INVALID") || message.contains("API key not valid")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> LlmError {
        LlmError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn quota_detected_from_status_code() {
        assert!(api(429, "Too Many Requests").is_quota());
    }

    #[test]
    fn quota_detected_from_body_markers() {
        assert!(api(400, "Quota exceeded for model").is_quota());
        assert!(api(400, "status: RESOURCE_EXHAUSTED").is_quota());
        // the "quota" match is case-insensitive, RESOURCE_EXHAUSTED is not
        assert!(api(400, "QUOTA limit").is_quota());
        assert!(!api(400, "resource_exhausted").is_quota());
    }

    #[test]
    fn invalid_key_markers() {
        assert!(api(400, "API_KEY_INVALID: check credentials").is_invalid_key());
        assert!(api(400, "API key not valid. Please pass a valid key.").is_invalid_key());
        assert!(!api(400, "API key missing").is_invalid_key());
    }

    #[test]
    fn network_failures_are_neither() {
        let err = LlmError::Network("connection refused".to_string());
        assert!(!err.is_quota());
        assert!(!err.is_invalid_key());
    }

    #[test]
    fn plain_server_error_is_not_quota() {
        assert!(!api(500, "internal error").is_quota());
    }
}
