use std::collections::BTreeMap;
use std::env;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqs_slurp::config::Config;
use sqs_slurp::errors::{ServiceError, SqsSlurpError};
use sqs_slurp::message::{Message, MessageAttribute};
use sqs_slurp::output::Rendered;
use sqs_slurp::receiver::{AwsSqsReceiver, MessageReceiver, ReceiveRequest};
use sqs_slurp::{app, client, reporter};
use tracing_subscriber::fmt::MakeWriter;

const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/orders";

/// Hands out a fixed result and records the request it was asked for.
struct FakeReceiver {
    result: Mutex<Option<Result<Message, SqsSlurpError>>>,
    requests: Mutex<Vec<ReceiveRequest>>,
}

impl FakeReceiver {
    fn returning(result: Result<Message, SqsSlurpError>) -> Self {
        Self {
            result: Mutex::new(Some(result)),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageReceiver for FakeReceiver {
    async fn receive_one(&self, request: &ReceiveRequest) -> Result<Message, SqsSlurpError> {
        self.requests.lock().unwrap().push(request.clone());
        self.result
            .lock()
            .unwrap()
            .take()
            .expect("receive_one called more than once")
    }
}

fn sample_message() -> Message {
    Message {
        message_id: Some("0f4a7c1e-1111-2222-3333-444455556666".to_string()),
        receipt_handle: Some("AQEB-receipt".to_string()),
        md5_of_body: Some("b10a8db164e0754105b7a99be72e3fe5".to_string()),
        body: Some("Hello World".to_string()),
        attributes: Some(BTreeMap::from([(
            "ApproximateReceiveCount".to_string(),
            "1".to_string(),
        )])),
        md5_of_message_attributes: Some("d25a6aea97eb8f585bfa92d314504a92".to_string()),
        message_attributes: Some(BTreeMap::from([(
            "tenant".to_string(),
            MessageAttribute {
                data_type: "String".to_string(),
                string_value: Some("acme".to_string()),
                ..MessageAttribute::default()
            },
        )])),
    }
}

fn config_with(extra: &str) -> Config {
    Config::from_yaml(&format!(
        "queue_url: {QUEUE_URL}\nregion: us-east-1\nmessage_attributes: [tenant]\n{extra}"
    ))
    .expect("test configuration should be valid")
}

#[tokio::test]
async fn export_writes_a_file_that_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("message.json");
    let config = config_with(&format!(
        "export_as: json\nexport_path: {}\n",
        path.display()
    ));
    let receiver = FakeReceiver::returning(Ok(sample_message()));
    let mut out = Vec::new();

    let rendered = app::run(&config, &receiver, &mut out).await.unwrap();

    assert_eq!(rendered, Rendered::Exported { path: path.clone() });
    assert!(out.is_empty(), "export mode should not print to the console");
    let exported: Message = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(exported, sample_message());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn export_replaces_an_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("message.json");
    std::fs::write(&path, "stale contents that are longer than nothing").unwrap();
    let config = config_with(&format!(
        "export_as: json\nexport_path: {}\n",
        path.display()
    ));
    let receiver = FakeReceiver::returning(Ok(sample_message()));

    app::run(&config, &receiver, &mut Vec::new()).await.unwrap();

    let exported: Message = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(exported, sample_message());
}

#[tokio::test]
async fn selected_fields_print_in_requested_order() {
    let config = config_with("output_fields: [Body, nonexistent, MessageId]\n");
    let receiver = FakeReceiver::returning(Ok(sample_message()));
    let mut out = Vec::new();

    let rendered = app::run(&config, &receiver, &mut out).await.unwrap();

    assert_eq!(rendered, Rendered::Printed { fields: 2 });
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Body: Hello World\nMessageId: 0f4a7c1e-1111-2222-3333-444455556666\n"
    );
}

#[tokio::test]
async fn dump_prints_the_whole_message() {
    let config = config_with("");
    let receiver = FakeReceiver::returning(Ok(sample_message()));
    let mut out = Vec::new();

    let rendered = app::run(&config, &receiver, &mut out).await.unwrap();

    assert_eq!(rendered, Rendered::Dumped);
    let dumped: Message = serde_json::from_slice(&out).unwrap();
    assert_eq!(dumped, sample_message());
}

#[tokio::test]
async fn request_carries_configured_filters() {
    let config = config_with("system_attributes: [SentTimestamp]\n");
    let receiver = FakeReceiver::returning(Ok(sample_message()));

    app::run(&config, &receiver, &mut Vec::new()).await.unwrap();

    let requests = receiver.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].queue_url, QUEUE_URL);
    assert_eq!(requests[0].message_attribute_names, vec!["tenant".to_string()]);
    assert_eq!(requests[0].system_attribute_names, vec!["SentTimestamp".to_string()]);
}

#[test]
fn missing_export_path_fails_before_anything_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yml");
    std::fs::write(
        &config_path,
        format!("queue_url: {QUEUE_URL}\nregion: us-east-1\nexport_as: json\n"),
    )
    .unwrap();

    let err = Config::load(&config_path).unwrap_err();

    assert!(matches!(err, SqsSlurpError::ConfigValidation(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn unsupported_export_format_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yml");
    std::fs::write(
        &config_path,
        format!(
            "queue_url: {QUEUE_URL}\nregion: us-east-1\nexport_as: xml\nexport_path: out.xml\n"
        ),
    )
    .unwrap();

    let err = Config::load(&config_path).unwrap_err();

    assert!(matches!(err, SqsSlurpError::ConfigValidation(_)));
}

#[test]
fn missing_config_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = Config::load(dir.path().join("absent.yml")).unwrap_err();

    assert!(matches!(err, SqsSlurpError::ConfigLoad { .. }));
}

#[test]
fn malformed_config_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yml");
    std::fs::write(&config_path, "queue_url: [unterminated\n").unwrap();

    let err = Config::load(&config_path).unwrap_err();

    match err {
        SqsSlurpError::ConfigLoad { path, .. } => assert_eq!(path, config_path.display().to_string()),
        other => panic!("expected load error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_queue_is_reported_as_no_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("message.json");
    let config = config_with(&format!(
        "export_as: json\nexport_path: {}\n",
        path.display()
    ));
    let receiver = FakeReceiver::returning(Err(SqsSlurpError::NoMessageAvailable {
        queue_url: QUEUE_URL.to_string(),
    }));

    let err = app::run(&config, &receiver, &mut Vec::new()).await.unwrap_err();

    assert!(matches!(err, SqsSlurpError::NoMessageAvailable { .. }));
    assert!(!path.exists());
    assert_eq!(receiver.request_count(), 1);
}

#[tokio::test]
async fn service_errors_propagate_unchanged() {
    let config = config_with("output_fields: [Body]\n");
    let receiver = FakeReceiver::returning(Err(ServiceError::Request {
        code: "AWS.SimpleQueueService.NonExistentQueue".to_string(),
        message: "The specified queue does not exist.".to_string(),
        status_code: 400,
        request_id: Some("req-1234".to_string()),
    }
    .into()));
    let mut out = Vec::new();

    let err = app::run(&config, &receiver, &mut out).await.unwrap_err();

    match err {
        SqsSlurpError::Service(service) => {
            assert_eq!(service.code(), "AWS.SimpleQueueService.NonExistentQueue");
        }
        other => panic!("expected service error, got {other:?}"),
    }
    assert!(out.is_empty());
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_report(err: &SqsSlurpError) -> String {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || reporter::report(err));
    logs.contents()
}

#[test]
fn reporter_logs_all_request_failure_fields() {
    let err = SqsSlurpError::from(ServiceError::Request {
        code: "AWS.SimpleQueueService.NonExistentQueue".to_string(),
        message: "queue-missing".to_string(),
        status_code: 400,
        request_id: Some("req-1234".to_string()),
    });

    let logs = capture_report(&err);

    assert!(logs.contains("AWS.SimpleQueueService.NonExistentQueue"), "{logs}");
    assert!(logs.contains("queue-missing"), "{logs}");
    assert!(logs.contains("status_code=400"), "{logs}");
    assert!(logs.contains("req-1234"), "{logs}");
}

#[test]
fn reporter_logs_service_failures_with_their_cause() {
    let cause: Box<dyn std::error::Error + Send + Sync> = "connection refused".into();
    let err = SqsSlurpError::from(ServiceError::Service {
        code: "DispatchFailure".to_string(),
        message: "dispatch failure".to_string(),
        source: Some(cause),
    });

    let logs = capture_report(&err);

    assert!(logs.contains("SQS call failed"), "{logs}");
    assert!(logs.contains("DispatchFailure"), "{logs}");
    assert!(logs.contains("dispatch failure"), "{logs}");
    assert!(logs.contains("connection refused"), "{logs}");
}

#[test]
fn reporter_logs_generic_errors() {
    let err = SqsSlurpError::from(sqs_slurp::errors::GenericError::new(
        "failed to write message.json: disk full".to_string(),
    ));

    let logs = capture_report(&err);

    assert!(logs.contains("disk full"), "{logs}");
}

/// Needs a reachable queue in `TEST_SQS_QUEUE_URL` plus ambient AWS credentials.
#[tokio::test]
#[ignore]
async fn test_sqs_integration() {
    dotenvy::dotenv().ok();

    let queue_url = env::var("TEST_SQS_QUEUE_URL").expect("TEST_SQS_QUEUE_URL must be set");
    let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

    let sqs_client = client::create_sqs_client(&region, None).await;

    sqs_client
        .send_message()
        .queue_url(&queue_url)
        .message_body("Slurp integration message")
        .send()
        .await
        .expect("Failed to send test message");

    let config = Config::from_yaml(&format!(
        "queue_url: {queue_url}\nregion: {region}\noutput_fields: [Body]\nwait_time_seconds: 5\n"
    ))
    .unwrap();
    let receiver = AwsSqsReceiver::new(sqs_client.clone(), config.receive.clone());
    let mut out = Vec::new();

    app::run(&config, &receiver, &mut out).await.unwrap();

    assert!(String::from_utf8(out).unwrap().starts_with("Body: "));

    let purge_result = sqs_client.purge_queue().queue_url(&queue_url).send().await;

    if let Err(e) = purge_result {
        println!("Warning: Failed to purge queue: {}", e);
    }
}
