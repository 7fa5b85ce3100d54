//! Monitor run.

use scribeops_monitor::{
    ConcurrencySampler, JobListingService, MetricsSink, MonitorConfig, MonitorResponse,
    SampleError,
};

/// Take one sample and shape the result for the caller.
pub fn run_monitor<L, M>(
    config: MonitorConfig,
    listing: L,
    sink: M,
) -> Result<MonitorResponse, SampleError>
where
    L: JobListingService,
    M: MetricsSink,
{
    let count = ConcurrencySampler::new(listing, sink, config).sample()?;
    Ok(MonitorResponse::ok(count))
}
