//! Process-wide rate limiter for outbound provider calls.

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Call timestamps older than this no longer count against the budget.
const WINDOW: Duration = Duration::from_secs(60);

/// Pause target when the window is full, measured from the oldest recorded
/// call. Two seconds past the window gives the provider-side minute room to
/// roll over.
const PAUSE_HORIZON: Duration = Duration::from_secs(62);

/// Sliding-window limiter shared by every AI call in the process.
pub struct RateLimiter {
    max_rpm: usize,
    window: Mutex<Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(max_rpm: usize) -> Self {
        Self {
            max_rpm: max_rpm.max(1),
            window: Mutex::new(Vec::new()),
        }
    }

    /// Wait until one more provider request may be issued, then record it.
    ///
    /// # Thread Safety
    ///
    /// The window lock is held across the whole prune/decide/pause/record
    /// sequence, including the sleep. Concurrent callers queue on the lock,
    /// so the window can never admit more than `max_rpm` calls per minute
    /// between them.
    pub async fn acquire(&self) {
        let mut window = self.window.lock().await;
        let now = Instant::now();
        window.retain(|t| now.duration_since(*t) < WINDOW);
        if window.len() >= self.max_rpm {
            if let Some(oldest) = window.first() {
                let pause = PAUSE_HORIZON.saturating_sub(now.duration_since(*oldest));
                if !pause.is_zero() {
                    tracing::info!(
                        pause_secs = pause.as_secs_f64(),
                        in_window = window.len(),
                        "Rate-limit window full, pausing"
                    );
                    sleep(pause).await;
                }
            }
            // After a pause the minute starts over for everyone.
            window.clear();
        }
        window.push(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn calls_under_the_budget_pass_immediately() {
        let limiter = RateLimiter::new(14);
        let start = Instant::now();
        for _ in 0..14 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn fifteenth_call_waits_out_the_window() {
        let limiter = RateLimiter::new(14);
        for _ in 0..14 {
            limiter.acquire().await;
        }

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::from_secs(62));
    }

    #[tokio::test(start_paused = true)]
    async fn window_is_cleared_after_a_pause() {
        let limiter = RateLimiter::new(14);
        for _ in 0..15 {
            limiter.acquire().await;
        }

        // Only the post-pause call remains, so a fresh burst fits again.
        let start = Instant::now();
        for _ in 0..13 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_is_measured_from_the_oldest_call() {
        let limiter = RateLimiter::new(2);
        limiter.acquire().await;
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        // oldest call is 30s old, so the pause is 62 - 30 = 32s
        assert_eq!(start.elapsed(), Duration::from_secs(32));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_calls_fall_out_of_the_window() {
        let limiter = RateLimiter::new(2);
        limiter.acquire().await;
        limiter.acquire().await;
        tokio::time::advance(Duration::from_secs(61)).await;

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_callers_share_one_window() {
        let limiter = std::sync::Arc::new(RateLimiter::new(3));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move { limiter.acquire().await }));
        }
        let start = Instant::now();
        for handle in handles {
            handle.await.unwrap();
        }
        // three pass immediately, the fourth waits the full horizon
        assert_eq!(start.elapsed(), Duration::from_secs(62));
    }
}
