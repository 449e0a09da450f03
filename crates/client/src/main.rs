//! `relay-client` -- terminal front end for the stream relay.
//!
//! Triggers one run, prints each message as it arrives, then a summary.
//!
//! # Environment variables
//!
//! | Variable    | Default                 | Description           |
//! |-------------|-------------------------|-----------------------|
//! | `RELAY_URL` | `http://localhost:4000` | Relay server base URL |

use relay_client::{ConsumerState, DisplayMessage, RelayClient, StreamConsumer, StreamObserver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints consumer progress to stdout.
struct TerminalShell;

impl StreamObserver for TerminalShell {
    fn on_run_started(&mut self, run_id: &str) {
        println!("Run ID: {run_id}");
    }

    fn on_message(&mut self, message: &DisplayMessage) {
        let marker = if message.raw { "!!" } else { "  " };
        println!(
            "{marker} {}  {}",
            message.received_at.to_rfc3339(),
            message.message
        );
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_url =
        std::env::var("RELAY_URL").unwrap_or_else(|_| "http://localhost:4000".into());
    tracing::info!(%base_url, "Starting stream");

    let mut consumer = StreamConsumer::new(RelayClient::new(base_url));
    let state = consumer.start_with(&mut TerminalShell).await;

    println!("Messages ({})", consumer.messages().len());

    if state == ConsumerState::Failed {
        eprintln!("Error: {}", consumer.error().unwrap_or("unknown error"));
        std::process::exit(1);
    }
}
