//! Infrastructure layer: adapters for the transcription and metrics services.
//!
//! - `in_memory`: simulated service and metrics sink (tests, dev runs)
//! - `aws`: Amazon Transcribe and CloudWatch via the AWS SDK (`aws` feature)

pub mod in_memory;

#[cfg(feature = "aws")]
pub mod aws;

pub use in_memory::{InMemoryMetricsSink, InMemoryTranscribeService};

#[cfg(feature = "aws")]
pub use aws::{AwsTranscribeService, CloudWatchMetricsSink, load_sdk_config};
