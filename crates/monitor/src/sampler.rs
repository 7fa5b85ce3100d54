//! Concurrency sampler: count in-progress jobs and publish one observation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use scribeops_core::{ConcurrencyObservation, JobState, ServiceError};

use crate::config::MonitorConfig;
use crate::listing::JobListingService;
use crate::metrics::{MetricDatum, MetricUnit, MetricsSink};

/// Sampling failure. Only raised when not a single page could be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("job listing unavailable: {0}")]
    UpstreamUnavailable(#[source] ServiceError),
}

/// Counts in-progress jobs across pages and publishes the total.
///
/// Best effort by construction:
/// - a listing error after at least one page ends pagination with the
///   partial count;
/// - a publish failure is logged and swallowed.
pub struct ConcurrencySampler<L, M> {
    listing: L,
    sink: M,
    config: MonitorConfig,
}

impl<L: JobListingService, M: MetricsSink> ConcurrencySampler<L, M> {
    pub fn new(listing: L, sink: M, config: MonitorConfig) -> Self {
        Self {
            listing,
            sink,
            config,
        }
    }

    /// Count in-progress jobs and publish exactly one observation.
    pub fn sample(&self) -> Result<u64, SampleError> {
        let count = self.count_in_progress()?;
        self.publish(&ConcurrencyObservation::now(count));
        Ok(count)
    }

    /// Count in-progress jobs without publishing.
    pub fn count_in_progress(&self) -> Result<u64, SampleError> {
        let mut total = 0u64;
        let mut pages = 0u32;
        let mut next_token: Option<String> = None;

        loop {
            let page = match self.listing.list(
                JobState::InProgress,
                self.config.page_size,
                next_token.as_deref(),
            ) {
                Ok(page) => page,
                Err(err) if pages == 0 => {
                    error!(kind = %err.kind, error = %err.message, "failed to list in-progress jobs");
                    return Err(SampleError::UpstreamUnavailable(err));
                }
                Err(err) => {
                    if err.kind.is_classified() {
                        warn!(
                            kind = %err.kind,
                            error = %err.message,
                            pages,
                            partial_count = total,
                            "listing stopped early; reporting partial count"
                        );
                    } else {
                        error!(
                            kind = %err.kind,
                            error = %err.message,
                            pages,
                            partial_count = total,
                            "unexpected listing error; reporting partial count"
                        );
                    }
                    break;
                }
            };

            pages += 1;
            total += page.summaries.len() as u64;
            debug!(page = pages, jobs = page.summaries.len(), total, "listed page");

            match page.continuation() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(total)
    }

    /// Publish one observation. Returns whether the sink accepted it.
    pub fn publish(&self, observation: &ConcurrencyObservation) -> bool {
        let datum = MetricDatum {
            metric_name: self.config.metric_name.clone(),
            value: observation.count as f64,
            unit: MetricUnit::Count,
            timestamp: observation.observed_at,
            dimensions: vec![self.config.dimension.clone()],
        };

        match self.sink.publish(&self.config.namespace, &datum) {
            Ok(()) => {
                info!(
                    namespace = %self.config.namespace,
                    concurrent_jobs = observation.count,
                    "published concurrency metric"
                );
                true
            }
            Err(err) => {
                error!(
                    namespace = %self.config.namespace,
                    concurrent_jobs = observation.count,
                    error = %err,
                    "failed to publish concurrency metric"
                );
                false
            }
        }
    }
}

/// Invocation result in the shape scheduled triggers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorResponse {
    pub status_code: u16,
    pub body: String,
}

impl MonitorResponse {
    pub fn ok(count: u64) -> Self {
        Self {
            status_code: 200,
            body: format!("Current concurrent Transcribe jobs: {count}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use proptest::prelude::*;
    use scribeops_core::{JobSummary, ServiceResult};

    use crate::listing::JobPage;
    use crate::metrics::{Dimension, MetricsError};

    /// Serves a fixed sequence of page results and records the tokens it saw.
    struct ScriptedListing {
        pages: Mutex<VecDeque<ServiceResult<JobPage>>>,
        tokens: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedListing {
        fn new(pages: Vec<ServiceResult<JobPage>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                tokens: Mutex::new(Vec::new()),
            }
        }

        fn tokens(&self) -> Vec<Option<String>> {
            self.tokens.lock().unwrap().clone()
        }
    }

    impl JobListingService for ScriptedListing {
        fn list(
            &self,
            state: JobState,
            page_size: u32,
            next_token: Option<&str>,
        ) -> ServiceResult<JobPage> {
            assert_eq!(state, JobState::InProgress);
            assert!(page_size <= 100);
            self.tokens.lock().unwrap().push(next_token.map(str::to_string));
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .expect("sampler requested a page past the end")
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        published: Mutex<Vec<(String, MetricDatum)>>,
        fail: bool,
    }

    impl MetricsSink for RecordingSink {
        fn publish(&self, namespace: &str, datum: &MetricDatum) -> Result<(), MetricsError> {
            self.published
                .lock()
                .unwrap()
                .push((namespace.to_string(), datum.clone()));
            if self.fail {
                Err(MetricsError::Transport("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    fn page(size: usize, next: Option<&str>) -> ServiceResult<JobPage> {
        let summaries = (0..size)
            .map(|i| JobSummary {
                name: format!("job-{i}"),
                state: JobState::InProgress,
            })
            .collect();
        Ok(JobPage::new(summaries, next.map(str::to_string)))
    }

    #[test]
    fn sums_pages_and_follows_tokens() {
        let listing = ScriptedListing::new(vec![
            page(100, Some("t1")),
            page(100, Some("t2")),
            page(37, None),
        ]);
        let sink = RecordingSink::default();
        let sampler = ConcurrencySampler::new(&listing, &sink, MonitorConfig::default());

        assert_eq!(sampler.sample(), Ok(237));
        assert_eq!(
            listing.tokens(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[test]
    fn empty_token_ends_pagination() {
        let listing = ScriptedListing::new(vec![page(3, Some("")), page(100, None)]);
        let sink = RecordingSink::default();
        let sampler = ConcurrencySampler::new(&listing, &sink, MonitorConfig::default());

        assert_eq!(sampler.count_in_progress(), Ok(3));
        assert_eq!(listing.tokens().len(), 1);
    }

    #[test]
    fn transient_error_after_pages_returns_partial_count() {
        let listing = ScriptedListing::new(vec![
            page(100, Some("t1")),
            page(100, Some("t2")),
            Err(ServiceError::limit_exceeded("throttled")),
        ]);
        let sink = RecordingSink::default();
        let sampler = ConcurrencySampler::new(&listing, &sink, MonitorConfig::default());

        assert_eq!(sampler.sample(), Ok(200));
        let published = sink.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].1.value, 200.0);
    }

    #[test]
    fn unrecognized_error_after_pages_also_degrades() {
        let listing = ScriptedListing::new(vec![
            page(5, Some("t1")),
            Err(ServiceError::unrecognized("", "connection reset")),
        ]);
        let sink = RecordingSink::default();
        let sampler = ConcurrencySampler::new(&listing, &sink, MonitorConfig::default());

        assert_eq!(sampler.count_in_progress(), Ok(5));
    }

    #[test]
    fn error_on_first_page_fails_without_publishing() {
        let listing =
            ScriptedListing::new(vec![Err(ServiceError::unavailable("service down"))]);
        let sink = RecordingSink::default();
        let sampler = ConcurrencySampler::new(&listing, &sink, MonitorConfig::default());

        let err = sampler.sample().unwrap_err();
        assert_eq!(
            err,
            SampleError::UpstreamUnavailable(ServiceError::unavailable("service down"))
        );
        assert!(sink.published.lock().unwrap().is_empty());
    }

    #[test]
    fn publishes_one_tagged_datum() {
        let listing = ScriptedListing::new(vec![page(4, None)]);
        let sink = RecordingSink::default();
        let config = MonitorConfig::default().with_namespace("LoadTest");
        let sampler = ConcurrencySampler::new(&listing, &sink, config);

        sampler.sample().unwrap();

        let published = sink.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (namespace, datum) = &published[0];
        assert_eq!(namespace, "LoadTest");
        assert_eq!(datum.metric_name, "ConcurrentTranscribeJobs");
        assert_eq!(datum.value, 4.0);
        assert_eq!(datum.unit, MetricUnit::Count);
        assert_eq!(datum.dimensions, vec![Dimension::new("Service", "Transcribe")]);
    }

    #[test]
    fn publish_failure_is_swallowed() {
        let listing = ScriptedListing::new(vec![page(9, None)]);
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let sampler = ConcurrencySampler::new(&listing, &sink, MonitorConfig::default());

        assert_eq!(sampler.sample(), Ok(9));
        assert_eq!(sink.published.lock().unwrap().len(), 1);
    }

    #[test]
    fn response_matches_trigger_shape() {
        let json = serde_json::to_value(MonitorResponse::ok(12)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statusCode": 200,
                "body": "Current concurrent Transcribe jobs: 12"
            })
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: the count is the sum of page sizes, and pagination stops
        /// exactly at the first page without a token.
        #[test]
        fn count_is_sum_of_pages(sizes in prop::collection::vec(0usize..=100, 1..12)) {
            let last = sizes.len() - 1;
            let pages = sizes
                .iter()
                .enumerate()
                .map(|(i, &size)| {
                    let token = format!("token-{i}");
                    page(size, (i < last).then_some(token.as_str()))
                })
                .collect();
            let listing = ScriptedListing::new(pages);
            let sink = RecordingSink::default();
            let sampler = ConcurrencySampler::new(&listing, &sink, MonitorConfig::default());

            let expected: u64 = sizes.iter().map(|&s| s as u64).sum();
            prop_assert_eq!(sampler.count_in_progress(), Ok(expected));
            prop_assert_eq!(listing.tokens().len(), sizes.len());
        }

        /// Property: an error after `n >= 1` good pages yields the sum of those pages.
        #[test]
        fn error_yields_sum_of_prior_pages(sizes in prop::collection::vec(0usize..=100, 1..8)) {
            let mut pages: Vec<ServiceResult<JobPage>> = sizes
                .iter()
                .enumerate()
                .map(|(i, &size)| page(size, Some(format!("token-{i}").as_str())))
                .collect();
            pages.push(Err(ServiceError::internal_failure("boom")));
            let listing = ScriptedListing::new(pages);
            let sink = RecordingSink::default();
            let sampler = ConcurrencySampler::new(&listing, &sink, MonitorConfig::default());

            let expected: u64 = sizes.iter().map(|&s| s as u64).sum();
            prop_assert_eq!(sampler.count_in_progress(), Ok(expected));
        }
    }
}
