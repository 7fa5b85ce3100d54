//! Job submission with retry, backoff, and rename-on-conflict.
//!
//! ## Design
//!
//! - One job at a time, single thread of control
//! - Every submission result is classified into an [`AttemptOutcome`]
//! - Transient/unknown errors: exponential backoff with additive jitter,
//!   bounded by a per-job [`RetryBudget`]
//! - Name conflicts: immediate retry under a fresh name, not budgeted
//! - Bad requests: abandoned at once
//! - All waiting goes through a [`Sleeper`] so timing is injectable
//!
//! ## Components
//!
//! - `SubmissionController`: the per-job retry state machine
//! - `BatchDriver`: runs the controller N times with a fixed inter-job delay
//! - `JobSubmissionService`: the transcription service seam
//! - `Shutdown` / `ThreadSleeper`: interruptible real-time waits

pub mod batch;
pub mod controller;
pub mod service;
pub mod sleeper;
pub mod types;

pub use batch::{BatchConfig, BatchDriver, BatchReport};
pub use controller::{RENAME_WARN_INTERVAL, SubmissionController};
pub use service::JobSubmissionService;
pub use sleeper::{Interrupted, RecordingSleeper, Shutdown, Sleeper, ThreadSleeper};
pub use types::{
    AbandonReason, AttemptOutcome, JITTER_FRACTION, RetryBudget, RetryPolicy, SubmissionOutcome,
    SubmissionReport, classify,
};
