//! Job submission and listing value types.

use serde::{Deserialize, Serialize};

use crate::id::JobName;

/// An `s3://bucket/key` locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Render as an `s3://` URI.
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

impl core::fmt::Display for S3Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Speaker role assigned to an audio channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    Agent,
    Customer,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Agent => "AGENT",
            ParticipantRole::Customer => "CUSTOMER",
        }
    }
}

/// Maps an audio channel to a participant role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDefinition {
    pub channel_id: u8,
    pub role: ParticipantRole,
}

impl ChannelDefinition {
    pub fn new(channel_id: u8, role: ParticipantRole) -> Self {
        Self { channel_id, role }
    }

    /// Two-channel call layout: agent on 0, customer on 1.
    pub fn agent_customer() -> Vec<Self> {
        vec![
            Self::new(0, ParticipantRole::Agent),
            Self::new(1, ParticipantRole::Customer),
        ]
    }
}

/// Everything needed to submit a job except its name.
///
/// The template is fixed for a whole batch; each submission identity is a
/// [`JobRequest`] stamped from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTemplate {
    pub media: S3Location,
    pub output_uri: String,
    pub data_access_role_arn: String,
    pub channels: Vec<ChannelDefinition>,
}

impl JobTemplate {
    /// Template for the load generator: results land under
    /// `s3://<output_bucket>/transcribe-results/`.
    pub fn call_analytics(
        media: S3Location,
        output_bucket: &str,
        data_access_role_arn: impl Into<String>,
    ) -> Self {
        Self {
            media,
            output_uri: format!("s3://{output_bucket}/transcribe-results/"),
            data_access_role_arn: data_access_role_arn.into(),
            channels: ChannelDefinition::agent_customer(),
        }
    }

    /// Stamp a request with the given identity.
    pub fn request(&self, name: JobName) -> JobRequest {
        JobRequest {
            name,
            media_uri: self.media.uri(),
            output_uri: self.output_uri.clone(),
            data_access_role_arn: self.data_access_role_arn.clone(),
            channels: self.channels.clone(),
        }
    }
}

/// One submission identity. Immutable: a rename produces a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub name: JobName,
    pub media_uri: String,
    pub output_uri: String,
    pub data_access_role_arn: String,
    pub channels: Vec<ChannelDefinition>,
}

/// Service-side lifecycle state of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Queued,
    InProgress,
    Failed,
    Completed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "QUEUED",
            JobState::InProgress => "IN_PROGRESS",
            JobState::Failed => "FAILED",
            JobState::Completed => "COMPLETED",
        }
    }
}

impl core::fmt::Display for JobState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    /// Status string as reported by the service (e.g. `IN_PROGRESS`).
    pub status: String,
}

impl SubmitAck {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Listing entry for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    pub state: JobState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_builds_locators_like_the_load_generator() {
        let template = JobTemplate::call_analytics(
            S3Location::new("in-bucket", "calls/sample.wav"),
            "out-bucket",
            "arn:aws:iam::123456789012:role/transcribe",
        );

        let name = JobName::from_string("CallAnalyticsJob-test");
        let request = template.request(name.clone());

        assert_eq!(request.name, name);
        assert_eq!(request.media_uri, "s3://in-bucket/calls/sample.wav");
        assert_eq!(request.output_uri, "s3://out-bucket/transcribe-results/");
        assert_eq!(request.channels, ChannelDefinition::agent_customer());
    }

    #[test]
    fn stamping_a_new_name_leaves_the_rest_untouched() {
        let template = JobTemplate::call_analytics(S3Location::new("b", "k"), "o", "role");

        let first = template.request(JobName::generate());
        let second = template.request(JobName::generate());

        assert_ne!(first.name, second.name);
        assert_eq!(first.media_uri, second.media_uri);
        assert_eq!(first.output_uri, second.output_uri);
    }

    #[test]
    fn roles_serialize_in_service_casing() {
        let json = serde_json::to_string(&ParticipantRole::Customer).unwrap();
        assert_eq!(json, "\"CUSTOMER\"");
        let json = serde_json::to_string(&JobState::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
