//! # Meridian Clock Crate
//!
//! A thin abstraction over the passage of time. Both the gateway's retry
//! backoff and the TWAP scheduler's inter-slice spacing suspend the task for
//! a duration; routing those suspensions through the `Sleeper` trait lets
//! tests observe and skip the waits instead of actually serving them.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// An injectable source of "wait this long".
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// The production sleeper, backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A sleeper that returns immediately and records every requested duration.
///
/// Used by tests to assert on backoff and slice-spacing behaviour without
/// real delays.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration passed to `sleep`, in call order.
    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}
