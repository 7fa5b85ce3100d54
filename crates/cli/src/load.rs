//! Load generator run.

use tracing::info;

use scribeops_jobs::{
    BatchDriver, BatchReport, JobSubmissionService, Sleeper, SubmissionController,
};

use crate::args::LoadArgs;

/// Submit `args.count` jobs one after another and report the totals.
///
/// Per-job failures are part of the report, never an error: the caller
/// decides the exit code.
pub fn run_load<S, Z>(args: &LoadArgs, service: S, sleeper: Z) -> BatchReport
where
    S: JobSubmissionService,
    Z: Sleeper,
{
    let template = args.template();
    info!(
        media = %template.media.uri(),
        output = %template.output_uri,
        region = %args.region,
        max_retries = args.max_retries,
        "load run configured"
    );

    let controller = SubmissionController::new(service, sleeper, args.retry_policy());
    BatchDriver::new(controller, args.batch_config()).run(&template)
}
