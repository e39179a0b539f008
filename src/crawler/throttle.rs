//! Pacing of requests: randomized politeness pauses and an injectable clock
//!
//! All waiting in the crawler goes through a [`Sleeper`], so tests can swap
//! the tokio timer for a [`RecordingSleeper`] and run without wall-clock delays.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Mutex;
use std::time::Duration;

/// Something that can wait for a duration
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real waiting on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately and remembers every requested pause
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// All pauses requested so far, in order
    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.recorded().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut slept) = self.slept.lock() {
            slept.push(duration);
        }
    }
}

/// A pause drawn uniformly from `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    pub min: Duration,
    pub max: Duration,
}

impl Pause {
    pub const fn between(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub const fn fixed(duration: Duration) -> Self {
        Self {
            min: duration,
            max: duration,
        }
    }

    pub const fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Politeness pauses used across a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    /// Between pages of one domain
    pub page: Pause,

    /// Between candidate domains
    pub domain: Pause,

    /// Between search queries
    pub query: Pause,
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            page: Pause::between(Duration::from_millis(300), Duration::from_millis(800)),
            domain: Pause::between(Duration::from_millis(600), Duration::from_millis(1200)),
            query: Pause::fixed(Duration::from_millis(800)),
        }
    }
}

impl Throttle {
    /// No pauses at all, for tests against local mock servers
    pub const fn disabled() -> Self {
        Self {
            page: Pause::none(),
            domain: Pause::none(),
            query: Pause::none(),
        }
    }
}
