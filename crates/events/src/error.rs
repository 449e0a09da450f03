use std::time::Duration;

use relay_core::error::CoreError;

use crate::run::RunId;

/// Errors returned by a [`TaskRunner`](crate::TaskRunner).
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// No task is registered under the requested id.
    #[error("Task '{0}' is not registered")]
    TaskNotFound(String),

    /// The runner cannot accept work (e.g. it is shutting down).
    #[error("Task runner unavailable: {0}")]
    Unavailable(String),

    /// No run exists with the given id.
    #[error("Run {0} not found")]
    RunNotFound(RunId),

    /// The stream has already been handed to another reader.
    #[error("Stream '{stream_id}' of run {run_id} already has a subscriber")]
    AlreadySubscribed { run_id: RunId, stream_id: String },

    /// Producer and reader disagree on the stream schema.
    #[error(transparent)]
    Schema(#[from] CoreError),
}

/// Errors yielded while pulling payloads from a [`PayloadStream`](crate::PayloadStream).
#[derive(Debug, thiserror::Error)]
pub enum StreamReadError {
    /// Nothing arrived within the per-pull wait window.
    #[error("No payload on stream '{stream_id}' within {}s", .waited.as_secs_f64())]
    Timeout { stream_id: String, waited: Duration },

    /// The underlying transport failed.
    #[error("Stream transport error: {0}")]
    Transport(String),
}

/// Errors raised by a task while writing to one of its streams.
#[derive(Debug, thiserror::Error)]
pub enum StreamWriteError {
    #[error("Stream '{stream_id}' of run {run_id} is closed")]
    Closed { run_id: RunId, stream_id: String },

    #[error(transparent)]
    Schema(#[from] CoreError),
}

/// Failure of a task body.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Stream(#[from] StreamWriteError),

    #[error("Task failed: {0}")]
    Failed(String),
}
