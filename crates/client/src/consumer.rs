//! Client stream consumer state machine.
//!
//! ```text
//! Idle -> Starting -> Streaming -> Completed
//!             |           |
//!             +-----------+------> Failed
//! ```
//!
//! `Completed` and `Failed` are terminal until the next
//! [`StreamConsumer::start`], which clears all previous results.

use std::fmt;

use chrono::Utc;
use futures::{Stream, StreamExt};

use crate::api::RelayClient;
use crate::deframer::LineDeframer;
use crate::message::DisplayMessage;

/// Where the consumer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Idle,
    Starting,
    Streaming,
    Completed,
    Failed,
}

/// Receives progress from a running [`StreamConsumer`].
///
/// Both methods default to doing nothing.
pub trait StreamObserver {
    fn on_run_started(&mut self, _run_id: &str) {}

    /// Called once for every message appended to the list, in order.
    fn on_message(&mut self, _message: &DisplayMessage) {}
}

impl StreamObserver for () {}

/// Triggers a run, subscribes to it and accumulates its messages.
pub struct StreamConsumer {
    client: RelayClient,
    state: ConsumerState,
    messages: Vec<DisplayMessage>,
    error: Option<String>,
    run_id: Option<String>,
}

impl StreamConsumer {
    pub fn new(client: RelayClient) -> Self {
        Self {
            client,
            state: ConsumerState::Idle,
            messages: Vec::new(),
            error: None,
            run_id: None,
        }
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    /// Messages received so far, in arrival order.
    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    /// Error recorded by the last transition to `Failed`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.state, ConsumerState::Starting | ConsumerState::Streaming)
    }

    /// Run one full trigger + subscribe + read cycle.
    pub async fn start(&mut self) -> ConsumerState {
        self.start_with(&mut ()).await
    }

    /// Like [`start`](Self::start), reporting progress to `observer`.
    pub async fn start_with(&mut self, observer: &mut impl StreamObserver) -> ConsumerState {
        self.messages.clear();
        self.error = None;
        self.run_id = None;
        self.state = ConsumerState::Starting;

        let run_id = match self.client.start_stream().await {
            Ok(run_id) => run_id,
            Err(e) => return self.fail(e.to_string()),
        };
        tracing::info!(%run_id, "Stream task started");
        observer.on_run_started(&run_id);
        self.run_id = Some(run_id.clone());

        let body = match self.client.subscribe(&run_id).await {
            Ok(body) => body,
            Err(e) => return self.fail(e.to_string()),
        };

        self.consume_body(body, observer).await
    }

    /// Drive the `Streaming` phase over an already-open response body.
    ///
    /// Each complete, non-blank line becomes one [`DisplayMessage`]. A
    /// trailing line without `\n` at end of body is discarded. A read error
    /// moves to `Failed` and keeps what was already received.
    pub async fn consume_body<S, B, E>(
        &mut self,
        body: S,
        observer: &mut impl StreamObserver,
    ) -> ConsumerState
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: fmt::Display,
    {
        self.state = ConsumerState::Streaming;

        let mut body = std::pin::pin!(body);
        let mut deframer = LineDeframer::new();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => return self.fail(format!("Stream read failed: {e}")),
            };

            for line in deframer.push(chunk.as_ref()) {
                if line.trim().is_empty() {
                    continue;
                }

                let message = DisplayMessage::from_line(&line, Utc::now());
                if message.raw {
                    tracing::warn!(%line, "Received a line that is not a message record");
                }
                observer.on_message(&message);
                self.messages.push(message);
            }
        }

        if let Some(residual) = deframer.finish() {
            tracing::debug!(bytes = residual.len(), "Discarding unterminated trailing line");
        }

        tracing::info!(count = self.messages.len(), "Stream completed");
        self.state = ConsumerState::Completed;
        self.state
    }

    fn fail(&mut self, error: String) -> ConsumerState {
        tracing::error!(%error, received = self.messages.len(), "Stream failed");
        self.error = Some(error);
        self.state = ConsumerState::Failed;
        self.state
    }
}
