use tracing::error;

use crate::errors::{ServiceError, SqsSlurpError};

/// Logs a terminal error with every detail it carries.
pub fn report(err: &SqsSlurpError) {
    match err {
        SqsSlurpError::Service(ServiceError::Request {
            code,
            message,
            status_code,
            request_id,
        }) => {
            error!(
                code = %code,
                error_message = %message,
                status_code = *status_code,
                request_id = request_id.as_deref().unwrap_or("unknown"),
                "SQS request failed"
            );
        }
        SqsSlurpError::Service(ServiceError::Service {
            code,
            message,
            source,
        }) => {
            let cause = source.as_ref().map(|e| e.to_string());
            error!(
                code = %code,
                error_message = %message,
                cause = cause.as_deref().unwrap_or("none"),
                "SQS call failed"
            );
        }
        SqsSlurpError::ConfigLoad { path, source } => {
            error!(path = %path, error = %source, "failed to load configuration");
        }
        SqsSlurpError::ConfigValidation(reason) => {
            error!(reason = %reason, "invalid configuration");
        }
        SqsSlurpError::NoMessageAvailable { queue_url } => {
            error!(queue_url = %queue_url, "no message available");
        }
        SqsSlurpError::GenericError(generic) => {
            error!(error = %generic, "run failed");
        }
    }
}
