//! Task runner boundary and the in-process [`LocalTaskRunner`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use relay_core::schema::StreamDefinition;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::error::{RunnerError, StreamWriteError, TaskError};
use crate::reader::PayloadStream;
use crate::run::{RunHandle, RunId, RunStatus};
use crate::table::RunTable;
use crate::writer::{RawStreamWriter, StreamWriter};

/// Default upper bound on how long a single run may execute.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(120);

/// Default time a finished run with unread streams is kept.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(600);

/// How often the retention job sweeps finished runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The two operations the relay needs from a task runner.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Start `task_id` asynchronously and return a handle to the new run.
    async fn trigger(
        &self,
        task_id: &str,
        payload: serde_json::Value,
    ) -> Result<RunHandle, RunnerError>;

    /// Open the named stream of a run for reading.
    ///
    /// `timeout` bounds each individual pull on the returned stream.
    async fn read_stream(
        &self,
        run_id: &RunId,
        stream_id: &str,
        version: u32,
        timeout: Duration,
    ) -> Result<PayloadStream, RunnerError>;
}

/// A unit of background work a [`LocalTaskRunner`] can execute.
#[async_trait]
pub trait Task: Send + Sync {
    /// Stable identifier used to trigger the task.
    fn id(&self) -> &'static str;

    async fn run(
        &self,
        ctx: TaskContext,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, TaskError>;
}

/// Per-run handle given to a [`Task`] body.
pub struct TaskContext {
    run_id: RunId,
    runs: Arc<RunTable>,
}

impl TaskContext {
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Open a typed writer for `definition` on this run.
    pub async fn stream<T: Serialize>(
        &self,
        definition: &StreamDefinition<T>,
    ) -> Result<StreamWriter<T>, StreamWriteError> {
        let tx = self
            .runs
            .sender(&self.run_id, definition.id(), definition.version())
            .await?;
        let raw = RawStreamWriter::new(self.run_id.clone(), definition.id(), tx);
        Ok(StreamWriter::new(*definition, raw))
    }
}

/// Runs registered tasks on the current tokio runtime.
///
/// Each trigger spawns one run. A run ends when its task returns, fails, or
/// exceeds `max_duration`; in every case its streams are closed so readers
/// see the end of the sequence. Runs are never retried.
pub struct LocalTaskRunner {
    tasks: HashMap<&'static str, Arc<dyn Task>>,
    runs: Arc<RunTable>,
    max_duration: Duration,
    cancel: CancellationToken,
}

impl LocalTaskRunner {
    pub fn new(max_duration: Duration) -> Self {
        Self {
            tasks: HashMap::new(),
            runs: Arc::new(RunTable::default()),
            max_duration,
            cancel: CancellationToken::new(),
        }
    }

    /// Register a task under its [`Task::id`], replacing any previous one.
    pub fn register(mut self, task: impl Task + 'static) -> Self {
        self.tasks.insert(task.id(), Arc::new(task));
        self
    }

    /// Current status of a run, or `None` for an unknown id.
    pub async fn run_status(&self, run_id: &RunId) -> Option<RunStatus> {
        self.runs.status(run_id).await
    }

    /// Number of runs currently tracked, finished or not.
    pub async fn run_count(&self) -> usize {
        self.runs.len().await
    }

    /// Evict finished runs now. See [`spawn_retention`](Self::spawn_retention).
    pub async fn evict_finished(&self, retention: Duration) -> usize {
        self.runs.sweep(retention).await
    }

    /// Start the background job that evicts finished runs.
    ///
    /// Every [`SWEEP_INTERVAL`] it drops finished runs whose streams have all
    /// been taken by readers, and finished runs older than `retention`
    /// whatever their state. Stops on [`shutdown`](Self::shutdown).
    pub fn spawn_retention(&self, retention: Duration) -> JoinHandle<()> {
        tokio::spawn(run_retention(
            Arc::clone(&self.runs),
            retention,
            self.cancel.child_token(),
        ))
    }

    /// Stop accepting triggers and stop every in-flight run.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Default for LocalTaskRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DURATION)
    }
}

#[async_trait]
impl TaskRunner for LocalTaskRunner {
    async fn trigger(
        &self,
        task_id: &str,
        payload: serde_json::Value,
    ) -> Result<RunHandle, RunnerError> {
        if self.cancel.is_cancelled() {
            return Err(RunnerError::Unavailable("runner is shutting down".into()));
        }

        let task = self
            .tasks
            .get(task_id)
            .cloned()
            .ok_or_else(|| RunnerError::TaskNotFound(task_id.to_string()))?;

        let run_id = RunId::generate();
        self.runs.insert(run_id.clone()).await;

        let ctx = TaskContext {
            run_id: run_id.clone(),
            runs: Arc::clone(&self.runs),
        };
        let runs = Arc::clone(&self.runs);
        let cancel = self.cancel.child_token();
        let max_duration = self.max_duration;
        let spawned_id = run_id.clone();

        tokio::spawn(async move {
            let run_id = spawned_id;
            let status = tokio::select! {
                result = tokio::time::timeout(max_duration, task.run(ctx, payload)) => match result {
                    Ok(Ok(output)) => {
                        tracing::info!(%run_id, task_id = task.id(), %output, "Run completed");
                        RunStatus::Completed
                    }
                    Ok(Err(e)) => {
                        tracing::error!(%run_id, task_id = task.id(), error = %e, "Run failed");
                        RunStatus::Failed
                    }
                    Err(_) => {
                        tracing::warn!(
                            %run_id,
                            task_id = task.id(),
                            max_duration_secs = max_duration.as_secs(),
                            "Run exceeded its maximum duration",
                        );
                        RunStatus::TimedOut
                    }
                },
                () = cancel.cancelled() => {
                    tracing::warn!(%run_id, task_id = task.id(), "Run stopped by runner shutdown");
                    RunStatus::Failed
                }
            };
            runs.finish(&run_id, status).await;
        });

        tracing::info!(%run_id, task_id, "Run triggered");

        Ok(RunHandle {
            id: run_id,
            task_id: task_id.to_string(),
        })
    }

    async fn read_stream(
        &self,
        run_id: &RunId,
        stream_id: &str,
        version: u32,
        timeout: Duration,
    ) -> Result<PayloadStream, RunnerError> {
        let rx = self.runs.take_receiver(run_id, stream_id, version).await?;

        tracing::debug!(%run_id, stream_id, timeout_secs = timeout.as_secs(), "Stream opened");

        Ok(PayloadStream::new(
            stream_id,
            UnboundedReceiverStream::new(rx).map(Ok),
            timeout,
        ))
    }
}

async fn run_retention(runs: Arc<RunTable>, retention: Duration, cancel: CancellationToken) {
    tracing::info!(
        retention_secs = retention.as_secs(),
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Run retention job started",
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("Run retention job stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = runs.sweep(retention).await;
                if evicted > 0 {
                    tracing::info!(evicted, "Run retention: evicted finished runs");
                } else {
                    tracing::debug!("Run retention: nothing to evict");
                }
            }
        }
    }
}
