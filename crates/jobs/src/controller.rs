//! Submission controller: classify each attempt and decide retry, rename, or abandon.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use scribeops_core::{JobName, JobRequest, JobTemplate, ServiceError, SubmitAck};

use super::service::JobSubmissionService;
use super::sleeper::Sleeper;
use super::types::{
    AbandonReason, AttemptOutcome, RetryBudget, RetryPolicy, SubmissionOutcome, SubmissionReport,
    classify,
};

/// Consecutive renames of one job between "still conflicting" warnings.
pub const RENAME_WARN_INTERVAL: u32 = 100;

/// Run of back-to-back name conflicts for one job. Any other outcome ends it.
#[derive(Debug, Default)]
struct RenameStreak(u32);

impl RenameStreak {
    /// Count one rename; true when a warning is due.
    fn record(&mut self) -> bool {
        self.0 += 1;
        self.0 % RENAME_WARN_INTERVAL == 0
    }

    fn reset(&mut self) {
        self.0 = 0;
    }

    fn len(&self) -> u32 {
        self.0
    }
}

/// Where one job's submission loop currently is.
#[derive(Debug)]
enum SubmissionState {
    Attempting,
    BackoffWait(std::time::Duration),
    Renamed,
    Succeeded(SubmitAck),
    Abandoned(AbandonReason),
}

/// Submits jobs one at a time under a [`RetryPolicy`].
///
/// - `NonRetryableRejected` abandons immediately.
/// - `NameConflict` retries at once under a fresh name and is not charged
///   against the budget.
/// - Transient and unknown errors back off exponentially with jitter until
///   the budget is spent.
pub struct SubmissionController<S, Z> {
    service: S,
    sleeper: Z,
    policy: RetryPolicy,
    rng: StdRng,
}

impl<S: JobSubmissionService, Z: Sleeper> SubmissionController<S, Z> {
    pub fn new(service: S, sleeper: Z, policy: RetryPolicy) -> Self {
        Self {
            service,
            sleeper,
            policy,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a seeded jitter source (deterministic backoff in tests).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn sleeper(&self) -> &Z {
        &self.sleeper
    }

    /// Submit one job built from `template`, retrying per policy.
    pub fn submit_with_retry(&mut self, template: &JobTemplate) -> SubmissionReport {
        let mut budget = RetryBudget::new(self.policy.clone());
        let mut request = template.request(JobName::generate());
        let mut calls = 0u32;
        let mut renames = 0u32;
        let mut streak = RenameStreak::default();
        let mut state = SubmissionState::Attempting;

        let outcome = loop {
            state = match state {
                SubmissionState::Attempting => {
                    calls += 1;
                    let outcome = classify(self.service.submit(&request));
                    if !matches!(outcome, AttemptOutcome::NameConflict(_)) {
                        streak.reset();
                    }
                    self.next_state(outcome, &request, &budget)
                }
                SubmissionState::BackoffWait(delay) => {
                    info!(
                        job = %request.name,
                        "Backing off for {:.2} seconds before retry",
                        delay.as_secs_f64()
                    );
                    if self.sleeper.sleep(delay).is_err() {
                        break SubmissionOutcome::Interrupted { name: request.name };
                    }
                    budget.charge();
                    info!(
                        attempt = budget.used(),
                        max_attempts = budget.max(),
                        "Retry attempt {}/{} for job {}",
                        budget.used(),
                        budget.max(),
                        request.name
                    );
                    SubmissionState::Attempting
                }
                SubmissionState::Renamed => {
                    renames += 1;
                    if streak.record() {
                        warn!(
                            job = %request.name,
                            consecutive = streak.len(),
                            renames,
                            "name conflicts persist; check job name generation"
                        );
                    }
                    request = template.request(JobName::generate());
                    info!(job = %request.name, "retrying with new job name");
                    SubmissionState::Attempting
                }
                SubmissionState::Succeeded(ack) => {
                    break SubmissionOutcome::Succeeded {
                        name: request.name,
                        status: ack.status,
                    };
                }
                SubmissionState::Abandoned(reason) => {
                    break SubmissionOutcome::Abandoned {
                        name: request.name,
                        reason,
                    };
                }
            };
        };

        SubmissionReport {
            outcome,
            calls,
            retries: budget.used(),
            renames,
        }
    }

    fn next_state(
        &mut self,
        outcome: AttemptOutcome,
        request: &JobRequest,
        budget: &RetryBudget,
    ) -> SubmissionState {
        match outcome {
            AttemptOutcome::Success(ack) => {
                info!(job = %request.name, status = %ack.status, "call analytics job started");
                SubmissionState::Succeeded(ack)
            }
            AttemptOutcome::NonRetryableRejected(err) => {
                error!(
                    job = %request.name,
                    error = %err.message,
                    "bad request error; check your input parameters"
                );
                SubmissionState::Abandoned(AbandonReason::Rejected(err))
            }
            AttemptOutcome::NameConflict(err) => {
                warn!(
                    job = %request.name,
                    error = %err.message,
                    "conflict error; a job with this name may already exist"
                );
                SubmissionState::Renamed
            }
            AttemptOutcome::TransientServiceError(err) => {
                warn!(job = %request.name, kind = %err.kind, error = %err.message, "transient service error");
                self.retry_or_abandon(err, budget)
            }
            AttemptOutcome::UnknownError(err) => {
                error!(
                    job = %request.name,
                    kind = %err.kind,
                    error = %err.message,
                    "unexpected error starting call analytics job"
                );
                self.retry_or_abandon(err, budget)
            }
        }
    }

    fn retry_or_abandon(&mut self, err: ServiceError, budget: &RetryBudget) -> SubmissionState {
        if budget.has_remaining() {
            SubmissionState::BackoffWait(budget.next_backoff(&mut self.rng))
        } else {
            error!(retries = budget.used(), "Max retries reached for {}", err.kind);
            SubmissionState::Abandoned(AbandonReason::RetriesExhausted(err))
        }
    }
}
