//! `scribeops-core`: shared building blocks.
//!
//! Pure value types only: job identities and requests, the service error
//! taxonomy, and the concurrency observation. No IO lives here.

pub mod error;
pub mod id;
pub mod job;
pub mod observation;

pub use error::{ServiceError, ServiceErrorKind, ServiceResult};
pub use id::{JobName, JOB_NAME_PREFIX};
pub use job::{
    ChannelDefinition, JobRequest, JobState, JobSummary, JobTemplate, ParticipantRole,
    S3Location, SubmitAck,
};
pub use observation::ConcurrencyObservation;
