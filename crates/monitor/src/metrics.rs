//! Metric datum model and the metrics sink seam.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unit attached to a published value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricUnit {
    Count,
    None,
}

impl MetricUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricUnit::Count => "Count",
            MetricUnit::None => "None",
        }
    }
}

/// Name/value pair that scopes a metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One metric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDatum {
    pub metric_name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub timestamp: DateTime<Utc>,
    pub dimensions: Vec<Dimension>,
}

/// Metric publication failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// The metrics service refused the datum.
    #[error("metric rejected: {0}")]
    Rejected(String),

    /// The request never completed (network, credentials, runtime).
    #[error("metrics transport error: {0}")]
    Transport(String),
}

/// Destination for metric samples.
pub trait MetricsSink: Send + Sync {
    fn publish(&self, namespace: &str, datum: &MetricDatum) -> Result<(), MetricsError>;
}

impl<T: MetricsSink + ?Sized> MetricsSink for &T {
    fn publish(&self, namespace: &str, datum: &MetricDatum) -> Result<(), MetricsError> {
        (**self).publish(namespace, datum)
    }
}

impl<T: MetricsSink + ?Sized> MetricsSink for Arc<T> {
    fn publish(&self, namespace: &str, datum: &MetricDatum) -> Result<(), MetricsError> {
        (**self).publish(namespace, datum)
    }
}
