//! Service error model shared by the listing and submission collaborators.

use thiserror::Error;

/// Result type returned by transcription-service collaborators.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error category reported by the transcription service.
///
/// Adapters map their transport-specific failures onto these kinds by error
/// code. Anything they cannot recognize lands in `Unrecognized`, which
/// callers must treat as retryable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceErrorKind {
    /// Malformed input or invalid parameters.
    BadRequest,

    /// A service quota or rate limit was hit.
    LimitExceeded,

    /// The resource already exists (e.g. duplicate job name).
    Conflict,

    /// The service failed internally.
    InternalFailure,

    /// The service is temporarily unavailable.
    Unavailable,

    /// An error the taxonomy does not know about, carrying the raw code.
    Unrecognized(String),
}

impl ServiceErrorKind {
    /// Map a service error code onto a kind.
    pub fn from_code(code: &str) -> Self {
        match code {
            "BadRequestException" => Self::BadRequest,
            "LimitExceededException" => Self::LimitExceeded,
            "ConflictException" => Self::Conflict,
            "InternalFailureException" => Self::InternalFailure,
            "ServiceUnavailableException" => Self::Unavailable,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Whether the kind belongs to the documented taxonomy.
    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl core::fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadRequest => f.write_str("bad request"),
            Self::LimitExceeded => f.write_str("service limit exceeded"),
            Self::Conflict => f.write_str("conflict"),
            Self::InternalFailure => f.write_str("internal service error"),
            Self::Unavailable => f.write_str("service unavailable"),
            Self::Unrecognized(code) if code.is_empty() => f.write_str("unexpected error"),
            Self::Unrecognized(code) => write!(f, "unexpected error ({code})"),
        }
    }
}

/// A failed call to the transcription service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::BadRequest, msg)
    }

    pub fn limit_exceeded(msg: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::LimitExceeded, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Conflict, msg)
    }

    pub fn internal_failure(msg: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::InternalFailure, msg)
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unavailable, msg)
    }

    pub fn unrecognized(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unrecognized(code.into()), msg)
    }
}
