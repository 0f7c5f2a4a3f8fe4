use std::error::Error as StdError;

use thiserror::Error;

use super::codes;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A value that may carry a structured, machine-readable backend error code.
///
/// Classification goes through this capability instead of matching on
/// human-readable messages.
pub trait ErrorCode {
    fn error_code(&self) -> Option<&str>;
}

/// Errors produced by a conditional write or bucket provisioning call
#[derive(Debug, Error)]
pub enum ConditionalWriteError {
    /// The object changed (or appeared) since the caller last observed it.
    #[error("precondition failed writing {bucket}/{key}: {message}")]
    PreconditionFailed {
        bucket: String,
        key: String,
        code: String,
        status: Option<u16>,
        message: String,
    },

    /// The backend answered with any other failure.
    #[error("backend error{}: {message}", fmt_code(.code))]
    Backend {
        code: Option<String>,
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// No backend response was obtained.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The write was accepted but the response carried no ETag.
    #[error("backend accepted write to {bucket}/{key} but returned no ETag")]
    MissingETag { bucket: String, key: String },

    #[error("failed to read object content: {0}")]
    Content(#[from] std::io::Error),
}

fn fmt_code(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({c})"))
        .unwrap_or_default()
}

impl ConditionalWriteError {
    pub fn backend(code: &str, status: u16, message: impl Into<String>) -> Self {
        ConditionalWriteError::Backend {
            code: Some(code.to_string()),
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    pub fn is_precondition_failed(&self) -> bool {
        self.error_code().is_some_and(codes::is_precondition_code)
    }

    /// HTTP status reported by the backend, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ConditionalWriteError::PreconditionFailed { status, .. }
            | ConditionalWriteError::Backend { status, .. } => *status,
            _ => None,
        }
    }
}

impl ErrorCode for ConditionalWriteError {
    fn error_code(&self) -> Option<&str> {
        match self {
            ConditionalWriteError::PreconditionFailed { code, .. } => Some(code),
            ConditionalWriteError::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Structured code of the first [`ConditionalWriteError`] found in `err`'s
/// source chain.
pub fn error_code<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a str> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(write_err) = e.downcast_ref::<ConditionalWriteError>() {
            return write_err.error_code();
        }
        current = e.source();
    }
    None
}

/// Whether `err` (or anything it wraps) reports a lost conditional-write race.
pub fn is_precondition_failed(err: &(dyn StdError + 'static)) -> bool {
    error_code(err).is_some_and(codes::is_precondition_code)
}

/// Result type for conditional write operations
pub type WriteResult<T> = Result<T, ConditionalWriteError>;
