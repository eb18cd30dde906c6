//! # SQS Slurp
//!
//! Fetches a single message from an AWS SQS queue and renders it: exported to
//! a JSON file, printed field by field, or dumped whole to stdout.
//!
//! ## Features
//!
//! - YAML configuration with eagerly validated output selection
//! - One `ReceiveMessage` call per run, batch size 1, short long-poll wait
//! - Export that never leaves a half-written file behind
//! - Field selection by exact name, in configured order
//! - Service errors classified with code, message, status and request id
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqs_slurp::{app, client::create_sqs_client, config::Config, receiver::AwsSqsReceiver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.yml")?;
//!     let client = create_sqs_client(&config.region, config.endpoint_url.as_deref()).await;
//!     let receiver = AwsSqsReceiver::new(client, config.receive.clone());
//!
//!     app::run(&config, &receiver, &mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod message;
pub mod output;
pub mod receiver;
pub mod reporter;
