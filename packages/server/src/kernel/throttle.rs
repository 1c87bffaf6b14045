//! Pacing for calls to the external extraction model.
//!
//! Combines a concurrency cap (semaphore) with a minimum spacing between call
//! starts (governor, one permit per period) and a per-call wall-clock timeout.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// How extraction calls are paced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Calls allowed in flight at once
    pub max_concurrent: usize,
    /// Minimum gap between the start of consecutive calls (zero disables)
    pub min_spacing: Duration,
    /// A call running longer than this is abandoned
    pub call_timeout: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            min_spacing: Duration::from_millis(7000),
            call_timeout: Duration::from_secs(120),
        }
    }
}

impl ThrottlePolicy {
    /// No spacing and generous concurrency; for tests and local fakes.
    pub fn unthrottled() -> Self {
        Self {
            max_concurrent: 16,
            min_spacing: Duration::ZERO,
            call_timeout: Duration::from_secs(120),
        }
    }
}

/// Shared gate every extraction call passes through before it starts.
#[derive(Clone)]
pub struct ExtractionThrottle {
    policy: ThrottlePolicy,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    slots: Arc<Semaphore>,
}

/// Held for the duration of one call; dropping it frees the slot.
pub struct ThrottlePermit {
    _slot: OwnedSemaphorePermit,
}

impl ExtractionThrottle {
    pub fn new(policy: ThrottlePolicy) -> Self {
        let limiter = Quota::with_period(policy.min_spacing)
            .map(|quota| Arc::new(RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN))));
        let slots = Arc::new(Semaphore::new(
            policy.max_concurrent.clamp(1, Semaphore::MAX_PERMITS),
        ));

        Self {
            policy,
            limiter,
            slots,
        }
    }

    pub fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    pub fn call_timeout(&self) -> Duration {
        self.policy.call_timeout
    }

    /// Wait for a free slot, then for the spacing window.
    pub async fn acquire(&self) -> Result<ThrottlePermit> {
        let slot = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .context("extraction throttle closed")?;

        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        Ok(ThrottlePermit { _slot: slot })
    }
}
