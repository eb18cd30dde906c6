use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sqs_slurp::client::create_sqs_client;
use sqs_slurp::config::{Config, DEFAULT_CONFIG_PATH};
use sqs_slurp::errors::SqsSlurpError;
use sqs_slurp::receiver::AwsSqsReceiver;
use sqs_slurp::{app, logging, reporter};

#[derive(Parser, Debug)]
#[command(name = "sqs-slurp", version, about)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            reporter::report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), SqsSlurpError> {
    let config = Config::load(&args.config)?;
    let client = create_sqs_client(&config.region, config.endpoint_url.as_deref()).await;
    let receiver = AwsSqsReceiver::new(client, config.receive.clone());

    let mut stdout = std::io::stdout().lock();
    app::run(&config, &receiver, &mut stdout).await?;
    Ok(())
}
