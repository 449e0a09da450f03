//! Background tasks executed by the relay's task runner.
//!
//! The only task is [`EmitMessages`], which paces a fixed list of
//! [`StreamRecord`](relay_core::record::StreamRecord)s onto
//! [`MESSAGE_STREAM`](relay_core::schema::MESSAGE_STREAM).

pub mod config;
pub mod emit_messages;

pub use config::WorkerConfig;
pub use emit_messages::{EmitMessages, EMIT_MESSAGES_TASK};
