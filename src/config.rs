//! Runtime configuration.
//!
//! Everything comes from environment variables so the binary can run inside
//! a container without a config file:
//! - `HOST` / `PORT`: listen address (default `0.0.0.0:5000`)
//! - `GEMINI_API_KEY`: Google AI Studio key; AI endpoints are disabled when
//!   it is missing or still the placeholder value
//! - `GEMINI_MODEL`: optional override for the first entry of the model
//!   priority list
//! - `POCKETSMART_MAX_RPM`: outbound requests per rolling minute (default 14)

/// Placeholder value shipped in sample env files; treated the same as unset.
const KEY_PLACEHOLDER: &str = "YOUR_GEMINI_API_KEY_HERE";

const DEFAULT_MAX_RPM: usize = 14;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub gemini_api_key: String,
    pub model_override: Option<String>,
    pub max_rpm: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_var_parsed("PORT", 5000),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map(|k| k.trim().to_string())
                .unwrap_or_default(),
            model_override: std::env::var("GEMINI_MODEL")
                .ok()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            // A zero limit would never admit a call, so clamp to at least 1.
            max_rpm: env_var_parsed("POCKETSMART_MAX_RPM", DEFAULT_MAX_RPM).max(1),
        }
    }

    /// Whether the configured key can be sent to the provider at all.
    pub fn api_key_valid(&self) -> bool {
        !self.gemini_api_key.is_empty() && self.gemini_api_key != KEY_PLACEHOLDER
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_var_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_is_not_valid() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            gemini_api_key: KEY_PLACEHOLDER.to_string(),
            model_override: None,
            max_rpm: 14,
        };
        assert!(!config.api_key_valid());
    }

    #[test]
    fn empty_key_is_not_valid() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            gemini_api_key: String::new(),
            model_override: None,
            max_rpm: 14,
        };
        assert!(!config.api_key_valid());
    }

    #[test]
    fn real_key_is_valid() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            gemini_api_key: "AIzaSyTest123".to_string(),
            model_override: None,
            max_rpm: 14,
        };
        assert!(config.api_key_valid());
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
