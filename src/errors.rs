use aws_sdk_sqs::config::http::HttpResponse;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::operation::RequestId;
use aws_sdk_sqs::operation::receive_message::ReceiveMessageError;
use thiserror::Error;

/// Error types for a single fetch-and-render run.
///
/// Every variant is terminal: nothing is retried, the error travels up to
/// `main`, gets reported, and the process exits with a failure status.
#[derive(Debug, Error)]
pub enum SqsSlurpError {
    /// The configuration file could not be read or parsed.
    #[error("failed to load configuration from {path}: {source}")]
    ConfigLoad {
        path: String,
        #[source]
        source: ConfigLoadSource,
    },

    /// The configuration parsed but describes something we cannot do.
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    /// The queue service rejected the receive call or it never completed.
    #[error("{0}")]
    Service(#[from] ServiceError),

    /// The receive call succeeded but the batch was empty.
    #[error("no message available on queue {queue_url}")]
    NoMessageAvailable { queue_url: String },

    #[error("{0}")]
    GenericError(#[from] GenericError),
}

/// Underlying cause of a [`SqsSlurpError::ConfigLoad`].
#[derive(Debug, Error)]
pub enum ConfigLoadSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// A failed call to the queue service.
///
/// `Request` means the service answered with an error response, so the HTTP
/// status and request id are known. `Service` covers everything that failed
/// before a response could be interpreted (dispatch, timeout, construction).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("SQS call failed: {code}: {message}")]
    Service {
        code: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(
        "SQS request failed: {code}: {message} (status {status_code}, request id {})",
        request_id.as_deref().unwrap_or("unknown")
    )]
    Request {
        code: String,
        message: String,
        status_code: u16,
        request_id: Option<String>,
    },
}

impl ServiceError {
    /// Machine-readable error code.
    pub fn code(&self) -> &str {
        match self {
            ServiceError::Service { code, .. } | ServiceError::Request { code, .. } => code,
        }
    }

    /// Human-readable error message.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::Service { message, .. } | ServiceError::Request { message, .. } => {
                message
            }
        }
    }
}

impl From<SdkError<ReceiveMessageError, HttpResponse>> for ServiceError {
    fn from(err: SdkError<ReceiveMessageError, HttpResponse>) -> Self {
        let code = err.code().unwrap_or("Unknown").to_string();
        let request_id = err.request_id().map(str::to_string);

        match err {
            SdkError::ServiceError(context) => {
                let status_code = context.raw().status().as_u16();
                let inner = context.into_err();
                ServiceError::Request {
                    code,
                    message: inner.message().unwrap_or("no message").to_string(),
                    status_code,
                    request_id,
                }
            }
            other => {
                let code = match &other {
                    SdkError::ConstructionFailure(_) => "ConstructionFailure",
                    SdkError::TimeoutError(_) => "TimeoutError",
                    SdkError::DispatchFailure(_) => "DispatchFailure",
                    SdkError::ResponseError(_) => "ResponseError",
                    _ => code.as_str(),
                }
                .to_string();
                ServiceError::Service {
                    code,
                    message: DisplayErrorContext(&other).to_string(),
                    source: Some(Box::new(other)),
                }
            }
        }
    }
}

/// Generic error type for handling unexpected errors.
#[derive(Debug, Error)]
pub struct GenericError(String);

impl GenericError {
    /// Creates a new `GenericError` with the provided message.
    pub fn new(message: String) -> Self {
        GenericError(message)
    }
}

impl std::fmt::Display for GenericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
