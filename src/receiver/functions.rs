use aws_sdk_sqs::types::MessageSystemAttributeName;
use tracing::{debug, info};

use crate::errors::{ServiceError, SqsSlurpError};
use crate::message::Message;
use crate::receiver::config::AwsSqsReceiverConfig;

/// What to ask SQS for on the receive call.
#[derive(Debug, Clone, Default)]
pub struct ReceiveRequest {
    pub queue_url: String,
    pub message_attribute_names: Vec<String>,
    pub system_attribute_names: Vec<String>,
}

/// Issues one `ReceiveMessage` call and returns the first message of the batch.
///
/// # Arguments
///
/// * `sqs_client` - The AWS SQS client to use
/// * `request` - Queue URL and attribute filters
/// * `config` - Batch size, visibility timeout and wait time
///
/// # Errors
///
/// Service failures become [`SqsSlurpError::Service`]; an empty batch becomes
/// [`SqsSlurpError::NoMessageAvailable`].
pub async fn receive_first_message(
    sqs_client: &aws_sdk_sqs::Client,
    request: &ReceiveRequest,
    config: &AwsSqsReceiverConfig,
) -> Result<Message, SqsSlurpError> {
    let mut call = sqs_client
        .receive_message()
        .queue_url(&request.queue_url)
        .max_number_of_messages(config.max_number_of_messages)
        .visibility_timeout(config.visibility_timeout)
        .wait_time_seconds(config.wait_time_seconds);

    if !request.message_attribute_names.is_empty() {
        call = call.set_message_attribute_names(Some(request.message_attribute_names.clone()));
    }
    for name in &request.system_attribute_names {
        call = call.message_system_attribute_names(MessageSystemAttributeName::from(name.as_str()));
    }

    debug!(
        queue_url = %request.queue_url,
        wait_time_seconds = config.wait_time_seconds,
        "receiving message"
    );

    let output = call.send().await.map_err(ServiceError::from)?;

    let message = output
        .messages
        .and_then(|messages| messages.into_iter().next())
        .ok_or_else(|| SqsSlurpError::NoMessageAvailable {
            queue_url: request.queue_url.clone(),
        })?;

    let message = Message::from(message);
    info!(
        message_id = message.message_id.as_deref().unwrap_or("unknown"),
        "received message"
    );
    Ok(message)
}
