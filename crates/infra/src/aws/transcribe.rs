//! Amazon Transcribe adapter: call-analytics submission and job listing.

use aws_config::SdkConfig;
use aws_sdk_transcribe::Client;
use aws_sdk_transcribe::types::{
    ChannelDefinition as SdkChannelDefinition, Media, ParticipantRole as SdkParticipantRole,
    TranscriptionJobStatus,
};
use tokio::runtime::Handle;
use tracing::{debug, instrument};

use scribeops_core::{
    JobRequest, JobState, JobSummary, ParticipantRole, ServiceResult, SubmitAck,
};
use scribeops_jobs::JobSubmissionService;
use scribeops_monitor::{JobListingService, JobPage};

use super::service_error;

/// Transcribe client bound to a runtime handle.
#[derive(Debug, Clone)]
pub struct AwsTranscribeService {
    client: Client,
    runtime: Handle,
}

impl AwsTranscribeService {
    pub fn new(client: Client, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    pub fn from_sdk_config(config: &SdkConfig, runtime: Handle) -> Self {
        Self::new(Client::new(config), runtime)
    }

    #[instrument(skip(self, request), fields(job = %request.name))]
    async fn start_call_analytics_job(&self, request: &JobRequest) -> ServiceResult<SubmitAck> {
        let channels = request
            .channels
            .iter()
            .map(|channel| {
                SdkChannelDefinition::builder()
                    .channel_id(i32::from(channel.channel_id))
                    .participant_role(sdk_role(channel.role))
                    .build()
            })
            .collect();

        let output = self
            .client
            .start_call_analytics_job()
            .call_analytics_job_name(request.name.as_str())
            .media(Media::builder().media_file_uri(&request.media_uri).build())
            .data_access_role_arn(&request.data_access_role_arn)
            .output_location(&request.output_uri)
            .set_channel_definitions(Some(channels))
            .send()
            .await
            .map_err(|e| service_error(&e))?;

        let status = output
            .call_analytics_job()
            .and_then(|job| job.call_analytics_job_status())
            .map(|status| status.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        Ok(SubmitAck::new(status))
    }

    async fn list_transcription_jobs(
        &self,
        state: JobState,
        page_size: u32,
        next_token: Option<&str>,
    ) -> ServiceResult<JobPage> {
        let output = self
            .client
            .list_transcription_jobs()
            .status(sdk_status(&state))
            .max_results(i32::try_from(page_size).unwrap_or(i32::MAX))
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| service_error(&e))?;

        let summaries: Vec<JobSummary> = output
            .transcription_job_summaries()
            .iter()
            .map(|summary| JobSummary {
                name: summary
                    .transcription_job_name()
                    .unwrap_or_default()
                    .to_string(),
                state: state.clone(),
            })
            .collect();
        debug!(jobs = summaries.len(), state = %state, "listed transcription jobs");

        Ok(JobPage::new(
            summaries,
            output.next_token().map(str::to_string),
        ))
    }
}

fn sdk_role(role: ParticipantRole) -> SdkParticipantRole {
    match role {
        ParticipantRole::Agent => SdkParticipantRole::Agent,
        ParticipantRole::Customer => SdkParticipantRole::Customer,
    }
}

fn sdk_status(state: &JobState) -> TranscriptionJobStatus {
    match state {
        JobState::Queued => TranscriptionJobStatus::Queued,
        JobState::InProgress => TranscriptionJobStatus::InProgress,
        JobState::Failed => TranscriptionJobStatus::Failed,
        JobState::Completed => TranscriptionJobStatus::Completed,
    }
}

impl JobSubmissionService for AwsTranscribeService {
    fn submit(&self, request: &JobRequest) -> ServiceResult<SubmitAck> {
        self.runtime.block_on(self.start_call_analytics_job(request))
    }
}

impl JobListingService for AwsTranscribeService {
    fn list(
        &self,
        state: JobState,
        page_size: u32,
        next_token: Option<&str>,
    ) -> ServiceResult<JobPage> {
        self.runtime
            .block_on(self.list_transcription_jobs(state, page_size, next_token))
    }
}
