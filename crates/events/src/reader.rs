//! Server-side stream reader.
//!
//! A [`PayloadStream`] yields the raw payloads of one stream in emission
//! order. It ends when the producer closes the stream and fails with
//! [`StreamReadError::Timeout`] when a single pull waits longer than the
//! configured window. The timeout is per pull: a stream that keeps emitting
//! more often than the window never times out, however long it lives.
//!
//! Payloads are opaque; the reader never looks inside them.

use std::fmt;
use std::time::Duration;

use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use relay_core::schema::StreamDefinition;

use crate::error::{RunnerError, StreamReadError};
use crate::run::RunId;
use crate::runner::TaskRunner;

/// Lazy, finite, non-restartable sequence of raw payloads.
pub struct PayloadStream {
    stream_id: String,
    source: BoxStream<'static, Result<String, StreamReadError>>,
    timeout: Duration,
    received: u64,
    done: bool,
}

impl PayloadStream {
    /// Wrap any payload source with a per-pull `timeout`.
    pub fn new<S>(stream_id: impl Into<String>, source: S, timeout: Duration) -> Self
    where
        S: Stream<Item = Result<String, StreamReadError>> + Send + 'static,
    {
        Self {
            stream_id: stream_id.into(),
            source: source.boxed(),
            timeout,
            received: 0,
            done: false,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Number of payloads yielded so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Wait for the next payload.
    ///
    /// Returns `None` once the stream is closed. After an error the stream
    /// is finished and every later call returns `None`.
    pub async fn next_payload(&mut self) -> Option<Result<String, StreamReadError>> {
        if self.done {
            return None;
        }

        match tokio::time::timeout(self.timeout, self.source.next()).await {
            Ok(Some(Ok(payload))) => {
                self.received += 1;
                Some(Ok(payload))
            }
            Ok(Some(Err(e))) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(_) => {
                self.done = true;
                Some(Err(StreamReadError::Timeout {
                    stream_id: self.stream_id.clone(),
                    waited: self.timeout,
                }))
            }
        }
    }

    /// Consume the reader as a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Result<String, StreamReadError>> + Send {
        stream::unfold(self, |mut reader| async move {
            reader.next_payload().await.map(|item| (item, reader))
        })
    }
}

impl fmt::Debug for PayloadStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadStream")
            .field("stream_id", &self.stream_id)
            .field("timeout", &self.timeout)
            .field("received", &self.received)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

/// Open the stream declared by `definition` for `run_id`.
pub async fn open_stream<T>(
    runner: &dyn TaskRunner,
    definition: &StreamDefinition<T>,
    run_id: &RunId,
    timeout: Duration,
) -> Result<PayloadStream, RunnerError> {
    runner
        .read_stream(run_id, definition.id(), definition.version(), timeout)
        .await
}
