//! Retry policy, per-job budget, and attempt outcomes.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use scribeops_core::{JobName, ServiceError, ServiceErrorKind, ServiceResult, SubmitAck};

/// Jitter is an additive fraction of the capped delay, at most this much.
pub const JITTER_FRACTION: f64 = 0.25;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retries for transient/unknown errors (0 = no retries)
    pub max_attempts: u32,
    /// Base delay, doubled per retry
    pub base_delay: Duration,
    /// Cap applied before jitter
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            ..Default::default()
        }
    }

    /// Create a policy with exponential backoff.
    pub fn exponential(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// `min(base * 2^attempt, max)` for a 0-based attempt, without jitter.
    pub fn capped_delay(&self, attempt: u32) -> Duration {
        let factor = 1u128.checked_shl(attempt).unwrap_or(u128::MAX);
        let nanos = self
            .base_delay
            .as_nanos()
            .saturating_mul(factor)
            .min(self.max_delay.as_nanos());
        duration_from_nanos(nanos)
    }

    /// Capped delay plus `jitter * 25%` of it. `jitter` is clamped to `[0, 1]`.
    pub fn delay_for_attempt(&self, attempt: u32, jitter: f64) -> Duration {
        let capped = self.capped_delay(attempt);
        let jitter = if jitter.is_nan() { 0.0 } else { jitter.clamp(0.0, 1.0) };
        let extra = (capped.as_nanos() as f64 * JITTER_FRACTION * jitter).floor() as u128;
        duration_from_nanos(capped.as_nanos().saturating_add(extra))
    }

    /// Delay for a 0-based attempt with jitter drawn uniformly from `rng`.
    ///
    /// Successive delays only grow while `base * 2^attempt` is below the cap.
    /// Once capped, each draw is independent within `[max, max * 1.25]`, so a
    /// later delay may be shorter than an earlier one.
    pub fn backoff<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        self.delay_for_attempt(attempt, rng.random::<f64>())
    }

    /// Check if more retries are allowed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

/// Retry counters for one job's whole submission lifecycle, renames included.
///
/// Only transient and unknown failures are charged; the controller never
/// charges past `max`.
#[derive(Debug, Clone)]
pub struct RetryBudget {
    used: u32,
    policy: RetryPolicy,
}

impl RetryBudget {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { used: 0, policy }
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn max(&self) -> u32 {
        self.policy.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.policy.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.policy.max_delay
    }

    pub fn has_remaining(&self) -> bool {
        self.policy.should_retry(self.used)
    }

    /// Backoff before the next retry, keyed on the retries used so far.
    pub fn next_backoff<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.policy.backoff(self.used, rng)
    }

    /// Consume one retry.
    pub fn charge(&mut self) {
        debug_assert!(self.has_remaining(), "retry budget overdrawn");
        self.used = self.used.saturating_add(1).min(self.policy.max_attempts);
    }
}

/// Classified result of one submission call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Accepted by the service
    Success(SubmitAck),
    /// Malformed input / invalid parameters; retrying cannot help
    NonRetryableRejected(ServiceError),
    /// The job name is already taken
    NameConflict(ServiceError),
    /// Capacity, internal failure or unavailability
    TransientServiceError(ServiceError),
    /// Anything not recognized by name; retried like a transient error
    UnknownError(ServiceError),
}

impl AttemptOutcome {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::TransientServiceError(_) | AttemptOutcome::UnknownError(_)
        )
    }
}

/// Map a submission result onto an [`AttemptOutcome`].
pub fn classify(result: ServiceResult<SubmitAck>) -> AttemptOutcome {
    match result {
        Ok(ack) => AttemptOutcome::Success(ack),
        Err(err) => match err.kind {
            ServiceErrorKind::BadRequest => AttemptOutcome::NonRetryableRejected(err),
            ServiceErrorKind::Conflict => AttemptOutcome::NameConflict(err),
            ServiceErrorKind::LimitExceeded
            | ServiceErrorKind::InternalFailure
            | ServiceErrorKind::Unavailable => AttemptOutcome::TransientServiceError(err),
            ServiceErrorKind::Unrecognized(_) => AttemptOutcome::UnknownError(err),
        },
    }
}

/// Why a job was given up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbandonReason {
    /// The service rejected the request as invalid.
    Rejected(ServiceError),
    /// The retry budget ran out; carries the last error seen.
    RetriesExhausted(ServiceError),
}

/// Terminal result of one job's submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded { name: JobName, status: String },
    Abandoned { name: JobName, reason: AbandonReason },
    /// Shutdown was requested while waiting to retry.
    Interrupted { name: JobName },
}

/// What happened while submitting one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub outcome: SubmissionOutcome,
    /// Calls made to the submission service
    pub calls: u32,
    /// Retries charged against the budget
    pub retries: u32,
    /// Fresh names generated after conflicts
    pub renames: u32,
}

impl SubmissionReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Succeeded { .. })
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Interrupted { .. })
    }
}
