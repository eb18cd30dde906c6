use crate::errors::SqsSlurpError;

/// Parameters for the single receive call.
///
/// This struct defines the parameters passed to SQS `ReceiveMessage`,
/// including the batch size, the visibility timeout and the wait time for
/// long polling.
///
/// # Fields
/// - `max_number_of_messages`: The maximum number of messages to receive. Always 1.
/// - `visibility_timeout`: How long the received message stays hidden, in seconds.
/// - `wait_time_seconds`: The wait time for long polling, in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSqsReceiverConfig {
    /// The maximum number of messages to receive in a single request.
    pub max_number_of_messages: i32,

    /// How long the message is hidden from other consumers, in seconds.
    pub visibility_timeout: i32,

    /// The wait time for long polling, in seconds.
    pub wait_time_seconds: i32,
}

impl AwsSqsReceiverConfig {
    /// Checks the values against the limits SQS enforces.
    pub fn validate(&self) -> Result<(), SqsSlurpError> {
        if self.max_number_of_messages != 1 {
            return Err(SqsSlurpError::ConfigValidation(format!(
                "max_number_of_messages must be 1, got {}",
                self.max_number_of_messages
            )));
        }
        if !(0..=43_200).contains(&self.visibility_timeout) {
            return Err(SqsSlurpError::ConfigValidation(format!(
                "visibility_timeout must be between 0 and 43200 seconds, got {}",
                self.visibility_timeout
            )));
        }
        if !(0..=20).contains(&self.wait_time_seconds) {
            return Err(SqsSlurpError::ConfigValidation(format!(
                "wait_time_seconds must be between 0 and 20 seconds, got {}",
                self.wait_time_seconds
            )));
        }
        Ok(())
    }
}

impl Default for AwsSqsReceiverConfig {
    fn default() -> Self {
        AwsSqsReceiverConfig {
            max_number_of_messages: 1,
            visibility_timeout: 1,
            wait_time_seconds: 1,
        }
    }
}
