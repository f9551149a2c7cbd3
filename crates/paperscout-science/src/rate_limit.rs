use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

/// Cooperative pause between per-item requests to the same origin.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn pause(&self);
}

/// Sleep a fixed interval after every item.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    interval: Duration,
}

impl FixedDelay {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn pause(&self) {
        if !self.interval.is_zero() {
            sleep(self.interval).await;
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl RateLimiter for NoDelay {
    async fn pause(&self) {}
}
