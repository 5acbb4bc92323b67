//! Retrying dispatcher wrapped around every outbound provider call.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::time::{sleep, Duration};

use super::throttle::RateLimiter;
use super::{ChatTurn, LlmError, TextGenerator};

/// Attempts per dispatched call, including the first.
const MAX_ATTEMPTS: usize = 3;

/// Terminal outcome of a dispatched AI call.
#[derive(Debug, Error)]
pub enum AiError {
    /// Provider quota stayed exhausted through every retry.
    #[error("provider quota exhausted after {MAX_ATTEMPTS} attempts")]
    QuotaExceeded,

    /// The provider rejected the configured API key.
    #[error("provider rejected the configured API key")]
    InvalidApiKey,

    /// Any other provider failure, verbatim.
    #[error("{0}")]
    Provider(String),
}

/// Pause before retrying a quota-limited attempt. Attempts are zero-indexed,
/// so the waits escalate 25s, 50s, 75s.
pub fn retry_backoff(attempt: usize) -> Duration {
    Duration::from_secs(((attempt + 1) * 25) as u64)
}

/// Runs provider calls through the shared rate limiter with quota retries.
pub struct Dispatcher {
    limiter: RateLimiter,
}

impl Dispatcher {
    pub fn new(max_rpm: usize) -> Self {
        Self {
            limiter: RateLimiter::new(max_rpm),
        }
    }

    /// Run `call` to completion or terminal failure.
    ///
    /// Every attempt first passes the rate limiter. A quota failure sleeps
    /// through [`retry_backoff`] and tries again, up to [`MAX_ATTEMPTS`]
    /// total; the last quota failure still sleeps before reporting
    /// [`AiError::QuotaExceeded`]. Auth and other failures return on the
    /// spot. Dropping the returned future cancels any pending wait.
    pub async fn dispatch<F, Fut>(&self, call: F) -> Result<String, AiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<String, LlmError>>,
    {
        for attempt in 0..MAX_ATTEMPTS {
            self.limiter.acquire().await;
            match call().await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_quota() => {
                    let wait = retry_backoff(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = MAX_ATTEMPTS,
                        wait_secs = wait.as_secs(),
                        "Provider quota hit, backing off"
                    );
                    sleep(wait).await;
                }
                Err(err) if err.is_invalid_key() => {
                    tracing::error!("Provider rejected the configured API key");
                    return Err(AiError::InvalidApiKey);
                }
                Err(err) => return Err(AiError::Provider(err.to_string())),
            }
        }
        Err(AiError::QuotaExceeded)
    }
}

/// A provider bundled with the dispatcher that guards it. This is what
/// request handlers talk to.
pub struct AiService {
    provider: Arc<dyn TextGenerator>,
    dispatcher: Dispatcher,
}

impl AiService {
    pub fn new(provider: Arc<dyn TextGenerator>, max_rpm: usize) -> Self {
        Self {
            provider,
            dispatcher: Dispatcher::new(max_rpm),
        }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.dispatcher
            .dispatch(|| self.provider.generate(prompt))
            .await
    }

    pub async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, AiError> {
        self.dispatcher
            .dispatch(|| self.provider.chat(history, message))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    fn quota_error() -> LlmError {
        LlmError::Api {
            status: 429,
            message: "RESOURCE_EXHAUSTED: quota exceeded".to_string(),
        }
    }

    #[test]
    fn backoff_escalates_per_attempt() {
        assert_eq!(retry_backoff(0), Duration::from_secs(25));
        assert_eq!(retry_backoff(1), Duration::from_secs(50));
        assert_eq!(retry_backoff(2), Duration::from_secs(75));
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_quota_exhausts_three_attempts() {
        let dispatcher = Dispatcher::new(14);
        let calls = AtomicUsize::new(0);
        let start = Instant::now();

        let result = dispatcher
            .dispatch(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<String, _>(quota_error()) }
            })
            .await;

        assert!(matches!(result, Err(AiError::QuotaExceeded)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 25 + 50 + 75, including the wait after the final attempt
        assert_eq!(start.elapsed(), Duration::from_secs(150));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_one_quota_hit() {
        let dispatcher = Dispatcher::new(14);
        let calls = AtomicUsize::new(0);
        let start = Instant::now();

        let result = dispatcher
            .dispatch(|| {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        Err(quota_error())
                    } else {
                        Ok("recovered".to_string())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(25));
    }

    #[tokio::test(start_paused = true)]
    async fn non_quota_errors_fail_fast() {
        let dispatcher = Dispatcher::new(14);
        let calls = AtomicUsize::new(0);
        let start = Instant::now();

        let result = dispatcher
            .dispatch(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<String, _>(LlmError::Api {
                        status: 500,
                        message: "internal".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(AiError::Provider(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_key_is_not_retried() {
        let dispatcher = Dispatcher::new(14);
        let calls = AtomicUsize::new(0);

        let result = dispatcher
            .dispatch(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<String, _>(LlmError::Api {
                        status: 400,
                        message: "API_KEY_INVALID".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(AiError::InvalidApiKey)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_costs_no_waiting() {
        let dispatcher = Dispatcher::new(14);
        let start = Instant::now();

        let result = dispatcher
            .dispatch(|| async { Ok("done".to_string()) })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
