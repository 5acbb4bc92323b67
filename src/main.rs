use std::sync::Arc;

use pocketsmart::api::routes::{serve, AppState};
use pocketsmart::config::Config;
use pocketsmart::llm::{AiService, GeminiClient, TextGenerator};
use pocketsmart::store::LedgerStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let ai = if config.api_key_valid() {
        let provider = Arc::new(GeminiClient::new(&config));
        tracing::info!(model = %provider.model(), "Gemini provider configured");
        Some(Arc::new(AiService::new(provider, config.max_rpm)))
    } else {
        tracing::warn!(
            "GEMINI_API_KEY not set; AI endpoints disabled. \
             Get a free key at https://aistudio.google.com/app/apikey"
        );
        None
    };

    let state = Arc::new(AppState {
        store: Arc::new(LedgerStore::new()),
        ai,
        config,
    });
    serve(state).await
}
