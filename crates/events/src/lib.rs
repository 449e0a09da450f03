//! Task-runner boundary for the stream relay.
//!
//! The relay depends on exactly two operations of a task runner, both on
//! [`TaskRunner`]:
//!
//! - [`TaskRunner::trigger`] starts a task run and returns its [`RunHandle`].
//! - [`TaskRunner::read_stream`] opens a [`PayloadStream`] over one named
//!   stream of a run.
//!
//! [`LocalTaskRunner`] is an in-process implementation that runs registered
//! [`Task`]s on the tokio runtime. Tasks write through a typed
//! [`StreamWriter`], so payloads always cross the boundary as explicit JSON
//! text.

pub mod error;
pub mod reader;
pub mod run;
pub mod runner;
pub mod writer;

mod table;

pub use error::{RunnerError, StreamReadError, StreamWriteError, TaskError};
pub use reader::{open_stream, PayloadStream};
pub use run::{RunHandle, RunId, RunStatus};
pub use runner::{LocalTaskRunner, Task, TaskContext, TaskRunner};
pub use writer::{RawStreamWriter, StreamWriter};
