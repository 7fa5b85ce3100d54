//! In-memory transcription service for tests/dev.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use scribeops_core::{
    JobRequest, JobState, JobSummary, ServiceError, ServiceResult, SubmitAck,
};
use scribeops_jobs::JobSubmissionService;
use scribeops_monitor::{JobListingService, JobPage, MAX_PAGE_SIZE};

/// Longest job name the service accepts.
pub const MAX_JOB_NAME_LEN: usize = 200;

#[derive(Debug, Default)]
struct ServiceState {
    /// Keyed by name; ordered so cursors are stable.
    jobs: BTreeMap<String, JobState>,
    submit_failures: VecDeque<ServiceError>,
    /// Keyed by 1-based `list` call number.
    list_failures: BTreeMap<u64, ServiceError>,
    submit_calls: u64,
    list_calls: u64,
}

/// Simulated transcription service.
///
/// Behaves like the real service for the parts the tools depend on:
/// - names are unique (`Conflict` on reuse);
/// - an optional capacity caps in-progress jobs (`LimitExceeded`);
/// - malformed requests are rejected (`BadRequest`);
/// - listing pages by name with an opaque continuation token.
///
/// Failures can also be queued explicitly to script error paths.
#[derive(Debug, Default)]
pub struct InMemoryTranscribeService {
    state: RwLock<ServiceState>,
    capacity: Option<usize>,
}

impl InMemoryTranscribeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject submissions with `LimitExceeded` once `capacity` jobs are in progress.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(ServiceState::default()),
            capacity: Some(capacity),
        }
    }

    /// Queue an error returned by the next `submit` call(s), in order.
    pub fn fail_next_submit(&self, error: ServiceError) {
        self.write().submit_failures.push_back(error);
    }

    /// Queue an error returned by the next `list` call(s), in order.
    pub fn fail_next_list(&self, error: ServiceError) {
        let mut state = self.write();
        let after = state
            .list_failures
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
            .max(state.list_calls);
        state.list_failures.insert(after + 1, error);
    }

    /// Fail the `call`-th `list` call (1-based, counted from creation).
    pub fn fail_list_call(&self, call: u64, error: ServiceError) {
        self.write().list_failures.insert(call, error);
    }

    /// Register an existing job directly (e.g. one started elsewhere).
    pub fn insert_job(&self, name: impl Into<String>, state: JobState) {
        self.write().jobs.insert(name.into(), state);
    }

    /// Complete every in-progress job.
    pub fn complete_all(&self) {
        for state in self.write().jobs.values_mut() {
            if *state == JobState::InProgress {
                *state = JobState::Completed;
            }
        }
    }

    pub fn count(&self, state: JobState) -> usize {
        self.read().jobs.values().filter(|s| **s == state).count()
    }

    pub fn job_names(&self) -> Vec<String> {
        self.read().jobs.keys().cloned().collect()
    }

    /// Total `submit` calls, failed ones included.
    pub fn submit_calls(&self) -> u64 {
        self.read().submit_calls
    }

    pub fn list_calls(&self) -> u64 {
        self.read().list_calls
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ServiceState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ServiceState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate(request: &JobRequest) -> ServiceResult<()> {
    let name = request.name.as_str();
    if name.is_empty() || name.len() > MAX_JOB_NAME_LEN {
        return Err(ServiceError::bad_request(format!(
            "job name must be 1-{MAX_JOB_NAME_LEN} characters"
        )));
    }
    if !request.media_uri.starts_with("s3://") {
        return Err(ServiceError::bad_request(format!(
            "media file uri is not an s3 location: {}",
            request.media_uri
        )));
    }
    if !request.output_uri.starts_with("s3://") {
        return Err(ServiceError::bad_request(format!(
            "output location is not an s3 location: {}",
            request.output_uri
        )));
    }
    if request.data_access_role_arn.is_empty() {
        return Err(ServiceError::bad_request("data access role arn is required"));
    }
    if request.channels.is_empty() {
        return Err(ServiceError::bad_request("channel definitions are required"));
    }
    Ok(())
}

impl JobSubmissionService for InMemoryTranscribeService {
    fn submit(&self, request: &JobRequest) -> ServiceResult<SubmitAck> {
        let mut state = self.write();
        state.submit_calls += 1;

        if let Some(err) = state.submit_failures.pop_front() {
            return Err(err);
        }
        validate(request)?;
        if state.jobs.contains_key(request.name.as_str()) {
            return Err(ServiceError::conflict(format!(
                "a job named {} already exists",
                request.name
            )));
        }
        if let Some(capacity) = self.capacity {
            let running = state
                .jobs
                .values()
                .filter(|s| **s == JobState::InProgress)
                .count();
            if running >= capacity {
                return Err(ServiceError::limit_exceeded(format!(
                    "{running} jobs in progress (limit {capacity})"
                )));
            }
        }

        state
            .jobs
            .insert(request.name.as_str().to_string(), JobState::InProgress);
        debug!(job = %request.name, "accepted job");
        Ok(SubmitAck::new(JobState::InProgress.as_str()))
    }
}

impl JobListingService for InMemoryTranscribeService {
    fn list(
        &self,
        state: JobState,
        page_size: u32,
        next_token: Option<&str>,
    ) -> ServiceResult<JobPage> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ServiceError::bad_request(format!(
                "max results must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let mut guard = self.write();
        guard.list_calls += 1;
        let call = guard.list_calls;
        if let Some(err) = guard.list_failures.remove(&call) {
            return Err(err);
        }

        let lower = match next_token {
            Some(token) => Bound::Excluded(token.to_string()),
            None => Bound::Unbounded,
        };
        let mut matching = guard
            .jobs
            .range((lower, Bound::Unbounded))
            .filter(|(_, s)| **s == state);

        let summaries: Vec<JobSummary> = matching
            .by_ref()
            .take(page_size as usize)
            .map(|(name, s)| JobSummary {
                name: name.clone(),
                state: s.clone(),
            })
            .collect();
        let has_more = matching.next().is_some();

        let next_token = if has_more {
            summaries.last().map(|summary| summary.name.clone())
        } else {
            None
        };
        Ok(JobPage::new(summaries, next_token))
    }
}
