//! In-progress job monitoring.
//!
//! Pages through the jobs the transcription service reports as in progress,
//! sums them, and publishes the total as a single metric sample. Listing and
//! publishing are collaborator traits ([`JobListingService`], [`MetricsSink`]);
//! adapters live in `scribeops-infra`.

pub mod config;
pub mod listing;
pub mod metrics;
pub mod sampler;

pub use config::{DEFAULT_NAMESPACE, METRIC_NAME, MonitorConfig, NAMESPACE_ENV};
pub use listing::{JobListingService, JobPage, MAX_PAGE_SIZE};
pub use metrics::{Dimension, MetricDatum, MetricUnit, MetricsError, MetricsSink};
pub use sampler::{ConcurrencySampler, MonitorResponse, SampleError};
