//! Job listing collaborator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use scribeops_core::{JobState, JobSummary, ServiceResult};

/// Upper bound the service accepts for one page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of job summaries plus the cursor for the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPage {
    pub summaries: Vec<JobSummary>,
    pub next_token: Option<String>,
}

impl JobPage {
    pub fn new(summaries: Vec<JobSummary>, next_token: Option<String>) -> Self {
        Self {
            summaries,
            next_token,
        }
    }

    /// Continuation token, treating an empty string as "no more pages".
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Lists jobs by state with cursor-based pagination.
pub trait JobListingService: Send + Sync {
    /// Fetch up to `page_size` (at most [`MAX_PAGE_SIZE`]) jobs in `state`,
    /// continuing from `next_token` when given.
    fn list(
        &self,
        state: JobState,
        page_size: u32,
        next_token: Option<&str>,
    ) -> ServiceResult<JobPage>;
}

impl<T: JobListingService + ?Sized> JobListingService for &T {
    fn list(
        &self,
        state: JobState,
        page_size: u32,
        next_token: Option<&str>,
    ) -> ServiceResult<JobPage> {
        (**self).list(state, page_size, next_token)
    }
}

impl<T: JobListingService + ?Sized> JobListingService for Arc<T> {
    fn list(
        &self,
        state: JobState,
        page_size: u32,
        next_token: Option<&str>,
    ) -> ServiceResult<JobPage> {
        (**self).list(state, page_size, next_token)
    }
}
