//! Elapsed-time measurement for one logical call.

use tokio::time::Instant;

/// Monotonic stopwatch started when a call begins.
///
/// Backed by `tokio::time::Instant`, so it follows a paused test clock.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds since the timer started.
    pub fn split(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_split_follows_clock() {
        let timer = Timer::start();
        assert_eq!(timer.split(), 0);

        tokio::time::advance(Duration::from_millis(1_250)).await;
        assert_eq!(timer.split(), 1_250);
    }
}
