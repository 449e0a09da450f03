//! Bookkeeping for runs and their named streams.
//!
//! Each (run, stream id) pair owns one unbounded channel. The channel is
//! created by whichever side touches it first, so payloads emitted before a
//! reader subscribes are buffered in emission order. The table keeps one
//! sender per stream while the run is alive; finishing the run drops it, and
//! the channel closes once the task's own writers are gone.
//!
//! Finished runs are removed by [`RunTable::sweep`]. A run whose streams
//! were all handed to readers goes on the next sweep; one with an unread
//! buffer goes once the retention window has passed.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::{RunnerError, StreamWriteError};
use crate::run::{RunId, RunStatus};

struct StreamSlot {
    version: u32,
    tx: Option<UnboundedSender<String>>,
    rx: Option<UnboundedReceiver<String>>,
}

impl StreamSlot {
    fn open(version: u32, closed: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            version,
            tx: if closed { None } else { Some(tx) },
            rx: Some(rx),
        }
    }
}

struct RunEntry {
    status: RunStatus,
    finished_at: Option<Instant>,
    streams: HashMap<String, StreamSlot>,
}

impl RunEntry {
    /// Whether nothing of this run is left waiting for a reader.
    fn consumed(&self) -> bool {
        self.streams.values().all(|slot| slot.rx.is_none())
    }

    fn expired(&self, now: Instant, retention: Duration) -> bool {
        match self.finished_at {
            Some(at) => self.consumed() || now.duration_since(at) >= retention,
            None => false,
        }
    }
}

#[derive(Default)]
pub(crate) struct RunTable {
    runs: RwLock<HashMap<RunId, RunEntry>>,
}

impl RunTable {
    pub(crate) async fn insert(&self, run_id: RunId) {
        self.runs.write().await.insert(
            run_id,
            RunEntry {
                status: RunStatus::Running,
                finished_at: None,
                streams: HashMap::new(),
            },
        );
    }

    pub(crate) async fn status(&self, run_id: &RunId) -> Option<RunStatus> {
        self.runs.read().await.get(run_id).map(|entry| entry.status)
    }

    /// Record the final status and drop the table's senders.
    pub(crate) async fn finish(&self, run_id: &RunId, status: RunStatus) {
        let mut runs = self.runs.write().await;
        if let Some(entry) = runs.get_mut(run_id) {
            entry.status = status;
            entry.finished_at = Some(Instant::now());
            for slot in entry.streams.values_mut() {
                slot.tx = None;
            }
        }
    }

    /// Remove finished runs that are consumed or older than `retention`.
    ///
    /// Running runs are never removed. Returns the number of runs evicted.
    pub(crate) async fn sweep(&self, retention: Duration) -> usize {
        let now = Instant::now();
        let mut runs = self.runs.write().await;
        let before = runs.len();
        runs.retain(|_, entry| !entry.expired(now, retention));
        before - runs.len()
    }

    pub(crate) async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    /// Sender for a task writing to `stream_id` of its own run.
    pub(crate) async fn sender(
        &self,
        run_id: &RunId,
        stream_id: &str,
        version: u32,
    ) -> Result<UnboundedSender<String>, StreamWriteError> {
        let closed = || StreamWriteError::Closed {
            run_id: run_id.clone(),
            stream_id: stream_id.to_string(),
        };

        let mut runs = self.runs.write().await;
        let entry = runs.get_mut(run_id).ok_or_else(closed)?;
        let finished = entry.status.is_finished();
        let slot = entry
            .streams
            .entry(stream_id.to_string())
            .or_insert_with(|| StreamSlot::open(version, finished));

        if slot.version != version {
            return Err(schema_mismatch(stream_id, slot.version, version).into());
        }

        slot.tx.clone().ok_or_else(closed)
    }

    /// Hand the receiving end of `stream_id` to a single reader.
    pub(crate) async fn take_receiver(
        &self,
        run_id: &RunId,
        stream_id: &str,
        version: u32,
    ) -> Result<UnboundedReceiver<String>, RunnerError> {
        let mut runs = self.runs.write().await;
        let entry = runs
            .get_mut(run_id)
            .ok_or_else(|| RunnerError::RunNotFound(run_id.clone()))?;
        let finished = entry.status.is_finished();
        let slot = entry
            .streams
            .entry(stream_id.to_string())
            .or_insert_with(|| StreamSlot::open(version, finished));

        if slot.version != version {
            return Err(schema_mismatch(stream_id, version, slot.version).into());
        }

        slot.rx.take().ok_or_else(|| RunnerError::AlreadySubscribed {
            run_id: run_id.clone(),
            stream_id: stream_id.to_string(),
        })
    }
}

fn schema_mismatch(stream_id: &str, expected: u32, found: u32) -> relay_core::error::CoreError {
    relay_core::error::CoreError::SchemaMismatch {
        stream_id: stream_id.to_string(),
        expected,
        found,
    }
}
