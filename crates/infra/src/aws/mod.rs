//! AWS SDK adapters (optional, `aws` feature).
//!
//! The collaborator traits are synchronous while the SDK is async. Each
//! adapter holds a `tokio::runtime::Handle` and drives SDK futures with
//! `Handle::block_on`, so callers must not invoke them from inside the
//! runtime's own worker threads.
//!
//! ## Error mapping
//!
//! | SDK error | `ServiceErrorKind` |
//! |-----------|--------------------|
//! | service error, code `BadRequestException` | `BadRequest` |
//! | service error, code `LimitExceededException` | `LimitExceeded` |
//! | service error, code `ConflictException` | `Conflict` |
//! | service error, code `InternalFailureException` | `InternalFailure` |
//! | service error, code `ServiceUnavailableException` | `Unavailable` |
//! | any other code | `Unrecognized(code)` |
//! | timeout, dispatch, response or construction failure | `Unrecognized("")` |

pub mod cloudwatch;
pub mod transcribe;

pub use cloudwatch::CloudWatchMetricsSink;
pub use transcribe::AwsTranscribeService;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_transcribe::config::Region;
use aws_sdk_transcribe::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tokio::runtime::Handle;

use scribeops_core::{ServiceError, ServiceErrorKind};

/// Load shared SDK configuration (credentials chain, region).
///
/// `region` overrides the default provider chain when given.
pub fn load_sdk_config(runtime: &Handle, region: Option<String>) -> SdkConfig {
    runtime.block_on(async move {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        loader.load().await
    })
}

/// Error code of a modeled service error, if the call got that far.
pub(crate) fn error_code<E, R>(err: &SdkError<E, R>) -> Option<&str>
where
    E: ProvideErrorMetadata,
{
    err.as_service_error().and_then(|e| e.code())
}

/// Map an SDK failure onto the shared service taxonomy.
pub(crate) fn service_error<E, R>(err: &SdkError<E, R>) -> ServiceError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let kind = ServiceErrorKind::from_code(error_code(err).unwrap_or_default());
    ServiceError::new(kind, DisplayErrorContext(err).to_string())
}
