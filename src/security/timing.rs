//! Timing attack protection utilities
//!
//! Login outcomes must not be distinguishable by how long they take, so
//! every attempt is padded to a minimum duration.

use std::time::{Duration, Instant};

/// Add artificial delay so the operation started at `start_time` takes at
/// least `min_duration`
async fn add_auth_delay(start_time: Instant, min_duration: Duration) {
    let elapsed = start_time.elapsed();
    if elapsed < min_duration {
        tokio::time::sleep(min_duration - elapsed).await;
    }
}

/// Authentication timing helper
pub struct AuthTimer {
    start: Instant,
    min_duration: Duration,
}

impl AuthTimer {
    /// Create a new auth timer with minimum duration
    pub fn new(min_duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            min_duration,
        }
    }

    /// Wait until minimum duration has elapsed
    pub async fn wait(self) {
        add_auth_delay(self.start, self.min_duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auth_timer_pads_fast_paths() {
        let timer = AuthTimer::new(Duration::from_millis(10));
        let start = Instant::now();
        timer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_auth_timer_does_not_delay_slow_paths() {
        let timer = AuthTimer::new(Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(20)).await;
        let start = Instant::now();
        timer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(5));
    }
}
