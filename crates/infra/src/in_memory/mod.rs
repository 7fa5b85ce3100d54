//! In-memory adapters (tests, dev runs without cloud credentials).

pub mod metrics;
pub mod transcribe;

pub use metrics::InMemoryMetricsSink;
pub use transcribe::{InMemoryTranscribeService, MAX_JOB_NAME_LEN};
