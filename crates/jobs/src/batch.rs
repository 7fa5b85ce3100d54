//! Sequential batch driver for the load generator.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use scribeops_core::JobTemplate;

use super::controller::SubmissionController;
use super::service::JobSubmissionService;
use super::sleeper::Sleeper;
use super::types::SubmissionOutcome;

/// Batch driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of jobs to start
    pub count: u64,
    /// Pause between consecutive submissions
    pub inter_job_delay: Duration,
    /// Log progress every this many submissions
    pub progress_every: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            inter_job_delay: Duration::from_millis(100),
            progress_every: 10,
        }
    }
}

impl BatchConfig {
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.inter_job_delay = delay;
        self
    }
}

/// Totals for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub requested: u64,
    /// Jobs that reached a terminal outcome (succeeded + failed)
    pub submitted: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// The run stopped early on a shutdown request
    pub interrupted: bool,
}

/// Runs the controller `count` times, one job after another.
///
/// The inter-job delay is applied between submissions only: never before the
/// first job nor after the last. A shutdown request stops the batch; the job
/// in flight at that point is counted neither as succeeded nor as failed.
pub struct BatchDriver<S, Z> {
    controller: SubmissionController<S, Z>,
    config: BatchConfig,
}

impl<S: JobSubmissionService, Z: Sleeper> BatchDriver<S, Z> {
    pub fn new(controller: SubmissionController<S, Z>, config: BatchConfig) -> Self {
        Self { controller, config }
    }

    pub fn run(&mut self, template: &JobTemplate) -> BatchReport {
        let total = self.config.count;
        let progress_every = self.config.progress_every.max(1);
        let mut report = BatchReport {
            requested: total,
            ..Default::default()
        };

        info!(count = total, "starting call analytics jobs");

        for index in 0..total {
            if self.controller.sleeper().is_interrupted() {
                report.interrupted = true;
                break;
            }
            if index > 0
                && self
                    .controller
                    .sleeper()
                    .sleep(self.config.inter_job_delay)
                    .is_err()
            {
                report.interrupted = true;
                break;
            }

            match self.controller.submit_with_retry(template).outcome {
                SubmissionOutcome::Succeeded { .. } => report.succeeded += 1,
                SubmissionOutcome::Abandoned { .. } => report.failed += 1,
                SubmissionOutcome::Interrupted { .. } => {
                    report.interrupted = true;
                    break;
                }
            }
            report.submitted += 1;

            if report.submitted % progress_every == 0 || report.submitted == total {
                info!(
                    submitted = report.submitted,
                    total,
                    succeeded = report.succeeded,
                    failed = report.failed,
                    "progress"
                );
            }
        }

        if report.interrupted {
            info!(submitted = report.submitted, "process interrupted by user; stopping");
        }
        info!(
            "Completed job submission. Successful: {}, Failed: {}",
            report.succeeded, report.failed
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use scribeops_core::{JobRequest, S3Location, ServiceError, ServiceResult, SubmitAck};

    use crate::sleeper::RecordingSleeper;
    use crate::types::RetryPolicy;

    struct ScriptedService {
        responses: Mutex<VecDeque<ServiceResult<SubmitAck>>>,
    }

    impl ScriptedService {
        fn new(responses: Vec<ServiceResult<SubmitAck>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    impl JobSubmissionService for ScriptedService {
        fn submit(&self, _request: &JobRequest) -> ServiceResult<SubmitAck> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(SubmitAck::new("QUEUED")))
        }
    }

    fn template() -> JobTemplate {
        JobTemplate::call_analytics(S3Location::new("in", "a.wav"), "out", "role")
    }

    fn driver<'a>(
        service: &'a ScriptedService,
        sleeper: &'a RecordingSleeper,
        config: BatchConfig,
    ) -> BatchDriver<&'a ScriptedService, &'a RecordingSleeper> {
        let policy = RetryPolicy::exponential(1, Duration::from_secs(1), Duration::from_secs(60));
        BatchDriver::new(SubmissionController::new(service, sleeper, policy), config)
    }

    #[test]
    fn all_successes_apply_delay_between_jobs_only() {
        let service = ScriptedService::new(vec![]);
        let sleeper = RecordingSleeper::new();
        let config = BatchConfig::default()
            .with_count(3)
            .with_delay(Duration::from_millis(100));

        let report = driver(&service, &sleeper, config).run(&template());

        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(report.submitted, 3);
        assert!(!report.interrupted);
        assert_eq!(sleeper.slept(), vec![Duration::from_millis(100); 2]);
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let service = ScriptedService::new(vec![
            Err(ServiceError::bad_request("bad")),
            Ok(SubmitAck::new("IN_PROGRESS")),
            Err(ServiceError::limit_exceeded("quota")),
            Err(ServiceError::limit_exceeded("quota")),
        ]);
        let sleeper = RecordingSleeper::new();
        let config = BatchConfig::default().with_count(3).with_delay(Duration::ZERO);

        let report = driver(&service, &sleeper, config).run(&template());

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.submitted, 3);
    }

    #[test]
    fn zero_count_submits_nothing() {
        let service = ScriptedService::new(vec![]);
        let sleeper = RecordingSleeper::new();

        let report = driver(&service, &sleeper, BatchConfig::default().with_count(0)).run(&template());

        assert_eq!(report, BatchReport::default());
        assert!(sleeper.slept().is_empty());
    }

    #[test]
    fn interrupt_during_inter_job_delay_stops_cleanly() {
        let service = ScriptedService::new(vec![]);
        let sleeper = RecordingSleeper::interrupt_on(2);
        let config = BatchConfig::default().with_count(10);

        let report = driver(&service, &sleeper, config).run(&template());

        assert!(report.interrupted);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.submitted, 2);
    }

    #[test]
    fn interrupt_during_backoff_is_not_a_failure() {
        let service = ScriptedService::new(vec![
            Ok(SubmitAck::new("IN_PROGRESS")),
            Err(ServiceError::unavailable("down")),
        ]);
        // First sleep is the inter-job delay, second is the backoff.
        let sleeper = RecordingSleeper::interrupt_on(2);
        let config = BatchConfig::default().with_count(5);

        let report = driver(&service, &sleeper, config).run(&template());

        assert!(report.interrupted);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.submitted, 1);
    }
}
