//! Monitor configuration.

use serde::{Deserialize, Serialize};

use crate::listing::MAX_PAGE_SIZE;
use crate::metrics::Dimension;

/// Environment variable overriding the metrics namespace.
pub const NAMESPACE_ENV: &str = "CLOUDWATCH_NAMESPACE";

pub const DEFAULT_NAMESPACE: &str = "TranscribeMonitoring";

pub const METRIC_NAME: &str = "ConcurrentTranscribeJobs";

/// Where and how the concurrency reading is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub namespace: String,
    pub metric_name: String,
    /// Fixed dimension identifying the monitored service
    pub dimension: Dimension,
    pub page_size: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            metric_name: METRIC_NAME.to_string(),
            dimension: Dimension::new("Service", "Transcribe"),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl MonitorConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Clamp to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}
