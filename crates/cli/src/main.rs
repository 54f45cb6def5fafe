//! Image push relay entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Wire observability**: install the `tracing-subscriber` stack from
//!    [`telemetry`] before anything else can log.
//! 2. **Load configuration**: read `DYNAMODB_TABLE` and `SNS_TOPIC_ARN` once;
//!    a missing key aborts startup before any event is handled.
//! 3. **Construct infrastructure**: build the DynamoDB and SNS clients from
//!    one shared SDK config and inject them into a [`PushRelay`].
//! 4. **Select trigger mode**:
//!    - `lambda` (default): serve events from the Lambda runtime API.
//!    - `invoke --event <PATH|->`: handle one event read from a file or
//!      stdin and print the response envelope.

mod telemetry;

use std::path::{Path, PathBuf};

use anyhow::Context;
use aws_config::BehaviorVersion;
use clap::{Parser, Subcommand};
use lambda_runtime::{service_fn, LambdaEvent};
use notifier::SnsNotificationChannel;
use relay::{InvocationId, PushRelay, RelayConfig};
use serde_json::Value;
use store::DynamoRecordStore;
use tokio::io::AsyncReadExt;
use tracing::{error, info, info_span, Instrument};

type Relay = PushRelay<DynamoRecordStore, SnsNotificationChannel>;

#[derive(Debug, Parser)]
#[command(name = "image-push-relay")]
#[command(about = "Record container image pushes and announce them", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve events from the AWS Lambda runtime API.
    Lambda,

    /// Handle a single event and print the response.
    Invoke {
        /// Path to the event JSON, or `-` for stdin.
        #[arg(long)]
        event: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _telemetry = telemetry::init()?;

    let config = RelayConfig::from_env().inspect_err(|err| error!(%err, "Refusing to start"))?;
    info!(
        table = %config.table_name,
        topic = %config.topic_arn,
        "Configuration loaded"
    );
    let relay = build_relay(&config).await;

    match cli.command.unwrap_or(Command::Lambda) {
        Command::Lambda => serve_lambda(&relay).await,
        Command::Invoke { event } => invoke_once(&relay, &event).await,
    }
}

/// Builds the clients once; they are shared by every invocation.
async fn build_relay(config: &RelayConfig) -> Relay {
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = DynamoRecordStore::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        config.table_name.clone(),
    );
    let channel = SnsNotificationChannel::new(
        aws_sdk_sns::Client::new(&sdk_config),
        config.topic_arn.clone(),
    );
    PushRelay::new(store, channel)
}

async fn serve_lambda(relay: &Relay) -> anyhow::Result<()> {
    info!("Serving events from the Lambda runtime");
    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| async move {
        let span = info_span!("invocation", request_id = %event.context.request_id);
        relay
            .handle(&event.payload)
            .instrument(span)
            .await
            .map_err(lambda_runtime::Error::from)
    }))
    .await
    .map_err(|err| anyhow::anyhow!(err))
    .context("Lambda runtime loop failed")
}

async fn invoke_once(relay: &Relay, source: &Path) -> anyhow::Result<()> {
    let event = read_event(source).await?;
    let span = info_span!("invocation", invocation_id = %InvocationId::new_random());
    let response = relay.handle(&event).instrument(span).await?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn read_event(source: &Path) -> anyhow::Result<Value> {
    let bytes = if source.as_os_str() == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("failed to read event from stdin")?;
        buf
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read event from {}", source.display()))?
    };
    parse_event(&bytes)
}

fn parse_event(bytes: &[u8]) -> anyhow::Result<Value> {
    serde_json::from_slice(bytes).context("event is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lambda_is_the_default_mode() {
        let cli = Cli::try_parse_from(["image-push-relay"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn invoke_takes_an_event_path() {
        let cli = Cli::try_parse_from(["image-push-relay", "invoke", "--event", "push.json"])
            .expect("parses");
        match cli.command {
            Some(Command::Invoke { event }) => assert_eq!(event, PathBuf::from("push.json")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn invoke_requires_an_event() {
        assert!(Cli::try_parse_from(["image-push-relay", "invoke"]).is_err());
    }

    #[test]
    fn parse_event_accepts_any_json_value() {
        let event = parse_event(br#"{"image_tag":"latest","repository":"svc"}"#).expect("valid");
        assert_eq!(event["repository"], "svc");
        assert!(parse_event(b"[]").is_ok());
    }

    #[test]
    fn parse_event_rejects_malformed_input() {
        assert!(parse_event(b"{not json").is_err());
    }
}
