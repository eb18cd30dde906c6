use async_trait::async_trait;

use crate::errors::SqsSlurpError;
use crate::message::Message;

pub mod config;
mod functions;

pub use config::AwsSqsReceiverConfig;
pub use functions::{ReceiveRequest, receive_first_message};

/// Source of the single message a run works on.
///
/// The AWS-backed implementation is [`AwsSqsReceiver`]; tests substitute their
/// own.
#[async_trait]
pub trait MessageReceiver: Send + Sync {
    /// Receives exactly one message, or fails.
    async fn receive_one(&self, request: &ReceiveRequest) -> Result<Message, SqsSlurpError>;
}

/// A struct that wraps the AWS SQS client.
pub struct AwsSqsReceiver {
    /// The AWS SQS client used to interact with the SQS service.
    sqs_client: aws_sdk_sqs::Client,

    /// Fixed parameters of the receive call.
    config: AwsSqsReceiverConfig,
}

impl AwsSqsReceiver {
    pub fn new(sqs_client: aws_sdk_sqs::Client, config: AwsSqsReceiverConfig) -> Self {
        AwsSqsReceiver { sqs_client, config }
    }
}

#[async_trait]
impl MessageReceiver for AwsSqsReceiver {
    async fn receive_one(&self, request: &ReceiveRequest) -> Result<Message, SqsSlurpError> {
        receive_first_message(&self.sqs_client, request, &self.config).await
    }
}
