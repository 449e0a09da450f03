//! Producer-side stream writers.
//!
//! [`RawStreamWriter`] is the transport boundary and accepts nothing but a
//! `String`. [`StreamWriter`] is the typed front end tasks use: it serializes
//! through the stream's [`StreamDefinition`] before handing text to the raw
//! writer, so a structured value can never reach the transport unencoded.

use relay_core::schema::StreamDefinition;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::StreamWriteError;
use crate::run::RunId;

/// Untyped writer for one stream of one run.
#[derive(Debug, Clone)]
pub struct RawStreamWriter {
    run_id: RunId,
    stream_id: &'static str,
    tx: UnboundedSender<String>,
}

impl RawStreamWriter {
    pub(crate) fn new(run_id: RunId, stream_id: &'static str, tx: UnboundedSender<String>) -> Self {
        Self {
            run_id,
            stream_id,
            tx,
        }
    }

    pub fn stream_id(&self) -> &'static str {
        self.stream_id
    }

    /// Append one payload to the stream.
    ///
    /// A reader that subscribed and then went away does not stop the
    /// producer: the payload is dropped and the run carries on.
    pub fn append_raw(&self, payload: String) {
        if self.tx.send(payload).is_err() {
            tracing::debug!(
                run_id = %self.run_id,
                stream_id = self.stream_id,
                "Reader gone, payload dropped",
            );
        }
    }
}

/// Typed writer for a stream declared by a [`StreamDefinition`].
#[derive(Debug, Clone)]
pub struct StreamWriter<T> {
    definition: StreamDefinition<T>,
    raw: RawStreamWriter,
}

impl<T: Serialize> StreamWriter<T> {
    pub(crate) fn new(definition: StreamDefinition<T>, raw: RawStreamWriter) -> Self {
        Self { definition, raw }
    }

    /// Encode `value` as JSON text and append it.
    pub fn append(&self, value: &T) -> Result<(), StreamWriteError> {
        let payload = self.definition.encode(value)?;
        self.raw.append_raw(payload);
        Ok(())
    }

    /// The untyped writer underneath, for payloads that are already text.
    pub fn raw(&self) -> &RawStreamWriter {
        &self.raw
    }
}
