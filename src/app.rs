use std::io::Write;

use tracing::info;

use crate::config::Config;
use crate::errors::SqsSlurpError;
use crate::output::{self, Rendered};
use crate::receiver::{MessageReceiver, ReceiveRequest};

/// Fetches one message with `receiver` and renders it as `config` asks.
///
/// Console output is written to `out`; export mode writes to the configured
/// file instead.
pub async fn run<R, W>(config: &Config, receiver: &R, out: &mut W) -> Result<Rendered, SqsSlurpError>
where
    R: MessageReceiver + ?Sized,
    W: Write,
{
    let request = ReceiveRequest {
        queue_url: config.queue_url.clone(),
        message_attribute_names: config.message_attribute_names.clone(),
        system_attribute_names: config.system_attribute_names.clone(),
    };

    let message = receiver.receive_one(&request).await?;
    let rendered = output::render(&message, &config.output, out)?;

    info!(?rendered, "done");
    Ok(rendered)
}
