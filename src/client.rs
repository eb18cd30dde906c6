use aws_config::{BehaviorVersion, Region};
use tracing::debug;

/// Creates an AWS SQS client for `region` using credentials from the environment.
///
/// Credentials are resolved by the default AWS provider chain, for example:
/// - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
/// - `AWS_PROFILE`
/// - instance or container metadata
///
/// # Arguments
///
/// * `region` - The AWS region (e.g., "us-east-1", "eu-west-1")
/// * `endpoint_url` - Optional endpoint override, such as a LocalStack URL
///
/// # Returns
///
/// Returns a configured `aws_sdk_sqs::Client` ready for use.
///
/// # Example
///
/// ```rust,no_run
/// use sqs_slurp::client::create_sqs_client;
///
/// #[tokio::main]
/// async fn main() {
///     let client = create_sqs_client("us-east-1", None).await;
///     // Use the client...
/// }
/// ```
pub async fn create_sqs_client(region: &str, endpoint_url: Option<&str>) -> aws_sdk_sqs::Client {
    let shared_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;

    let mut builder = aws_sdk_sqs::config::Builder::from(&shared_config);
    if let Some(endpoint_url) = endpoint_url {
        debug!(endpoint_url, "using custom SQS endpoint");
        builder = builder.endpoint_url(endpoint_url);
    }

    aws_sdk_sqs::Client::from_conf(builder.build())
}
