//! Command-line front ends for the load generator and the concurrency monitor.
//!
//! The binaries (`transcribe-load`, `transcribe-monitor`) need the `aws`
//! feature; everything else here is generic over the service traits so it
//! runs against the in-memory adapters too.

pub mod args;
pub mod exit;
pub mod load;
pub mod monitor;
#[cfg(feature = "aws")]
pub mod runtime;

pub use args::{LoadArgs, MonitorArgs, parse_seconds};
pub use exit::catch_panic;
pub use load::run_load;
pub use monitor::run_monitor;
