use parking_lot::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

/// Minimum spacing between outbound calls to the REST news API.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// Process-wide gate spacing outbound calls to a rate-limited upstream.
///
/// One instance is built at startup and handed to the clients that need it.
/// The wait is computed under the lock but slept outside it, so concurrent
/// callers that read the same timestamp compute overlapping waits and may
/// fire close together. That race is accepted; only sequential callers are
/// guaranteed `min_delay` spacing.
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_delay: Duration,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_delay,
        }
    }

    /// Wait until `min_delay` has passed since the previous call returned.
    pub async fn acquire(&self) {
        let wait_time = {
            let last = self.last_request.lock();
            last.and_then(|at| {
                let elapsed = at.elapsed();
                (elapsed < self.min_delay).then(|| self.min_delay - elapsed)
            })
        };

        if let Some(delay) = wait_time {
            debug!("Rate limiter delaying outbound call by {:?}", delay);
            sleep(delay).await;
        }

        *self.last_request.lock() = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MIN_INTERVAL)
    }
}
