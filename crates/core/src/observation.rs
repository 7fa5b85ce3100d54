//! Point-in-time concurrency reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Count of in-progress jobs at one instant. Published once, never retained.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyObservation {
    pub count: u64,
    pub observed_at: DateTime<Utc>,
}

impl ConcurrencyObservation {
    pub fn new(count: u64, observed_at: DateTime<Utc>) -> Self {
        Self { count, observed_at }
    }

    /// Observation stamped with the current time.
    pub fn now(count: u64) -> Self {
        Self::new(count, Utc::now())
    }
}
