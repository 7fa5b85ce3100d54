//! In-memory metrics sink for tests/dev.

use std::sync::{Mutex, PoisonError};

use scribeops_monitor::{MetricDatum, MetricsError, MetricsSink};

/// Keeps every published datum; can be switched to fail every publish.
#[derive(Debug, Default)]
pub struct InMemoryMetricsSink {
    published: Mutex<Vec<(String, MetricDatum)>>,
    failure: Option<MetricsError>,
}

impl InMemoryMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records the attempt and then returns `error`.
    pub fn failing(error: MetricsError) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    /// `(namespace, datum)` pairs in publish order.
    pub fn published(&self) -> Vec<(String, MetricDatum)> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MetricsSink for InMemoryMetricsSink {
    fn publish(&self, namespace: &str, datum: &MetricDatum) -> Result<(), MetricsError> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((namespace.to_string(), datum.clone()));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
