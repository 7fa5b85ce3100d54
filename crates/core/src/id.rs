//! Strongly-typed job identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix used for generated call-analytics job names.
pub const JOB_NAME_PREFIX: &str = "CallAnalyticsJob";

/// Unique name of a transcription job.
///
/// The service keys jobs by name, so a name collision means the submission
/// must be retried under a freshly generated name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobName(String);

impl JobName {
    /// Generate a new random name (`CallAnalyticsJob-<uuid v4>`).
    pub fn generate() -> Self {
        Self(format!("{}-{}", JOB_NAME_PREFIX, Uuid::new_v4()))
    }

    /// Wrap an existing name without validation.
    pub fn from_string(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for JobName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<JobName> for String {
    fn from(value: JobName) -> Self {
        value.0
    }
}
