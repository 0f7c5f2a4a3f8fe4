use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::domain::{
    errors::{ConditionalWriteError, ErrorCode, codes},
    value_objects::ObjectIdentity,
};

impl<E, R> ErrorCode for SdkError<E, R>
where
    E: ProvideErrorMetadata,
{
    fn error_code(&self) -> Option<&str> {
        self.code()
    }
}

/// Translate an SDK failure into the domain taxonomy.
///
/// Only the structured error code decides whether this was a lost race.
pub(crate) fn classify_sdk_error<E>(
    err: SdkError<E, HttpResponse>,
    identity: &ObjectIdentity,
) -> ConditionalWriteError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(_) => {
            let code = err.error_code().map(str::to_owned);
            let message = err
                .message()
                .map(str::to_owned)
                .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
            let status = err.raw_response().map(|r| r.status().as_u16());

            match code {
                Some(code) if codes::is_precondition_code(&code) => {
                    ConditionalWriteError::PreconditionFailed {
                        bucket: identity.bucket().to_string(),
                        key: identity.key().to_string(),
                        code,
                        status,
                        message,
                    }
                }
                code => ConditionalWriteError::Backend {
                    code,
                    status,
                    message,
                    source: Some(Box::new(err)),
                },
            }
        }
        SdkError::ResponseError(_) => ConditionalWriteError::Backend {
            code: None,
            status: err.raw_response().map(|r| r.status().as_u16()),
            message: DisplayErrorContext(&err).to_string(),
            source: Some(Box::new(err)),
        },
        // Timeouts, dispatch and construction failures: no response was obtained
        _ => ConditionalWriteError::Transport {
            message: DisplayErrorContext(&err).to_string(),
            source: Box::new(err),
        },
    }
}
