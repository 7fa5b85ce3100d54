//! Job submission collaborator.

use std::sync::Arc;

use scribeops_core::{JobRequest, ServiceResult, SubmitAck};

/// Starts call-analytics jobs on the transcription service.
///
/// Implementations must report failures through the shared
/// [`ServiceErrorKind`](scribeops_core::ServiceErrorKind) taxonomy; the
/// controller decides retries from it.
pub trait JobSubmissionService: Send + Sync {
    fn submit(&self, request: &JobRequest) -> ServiceResult<SubmitAck>;
}

impl<T: JobSubmissionService + ?Sized> JobSubmissionService for &T {
    fn submit(&self, request: &JobRequest) -> ServiceResult<SubmitAck> {
        (**self).submit(request)
    }
}

impl<T: JobSubmissionService + ?Sized> JobSubmissionService for Arc<T> {
    fn submit(&self, request: &JobRequest) -> ServiceResult<SubmitAck> {
        (**self).submit(request)
    }
}
