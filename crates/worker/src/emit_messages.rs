//! The `emit-messages` producer task.

use std::time::Duration;

use async_trait::async_trait;
use relay_core::record::StreamRecord;
use relay_core::schema::MESSAGE_STREAM;
use relay_events::{Task, TaskContext, TaskError};
use serde_json::json;

use crate::config::WorkerConfig;

/// Task id the relay triggers.
pub const EMIT_MESSAGES_TASK: &str = "emit-messages";

/// Emits one [`StreamRecord`] per configured message, pausing between them.
pub struct EmitMessages {
    messages: Vec<String>,
    delay: Duration,
}

impl EmitMessages {
    pub fn new(config: &WorkerConfig) -> Self {
        Self {
            messages: config.messages.clone(),
            delay: config.emit_delay,
        }
    }
}

#[async_trait]
impl Task for EmitMessages {
    fn id(&self) -> &'static str {
        EMIT_MESSAGES_TASK
    }

    async fn run(
        &self,
        ctx: TaskContext,
        _payload: serde_json::Value,
    ) -> Result<serde_json::Value, TaskError> {
        tracing::info!(run_id = %ctx.run_id(), count = self.messages.len(), "Starting to emit messages");

        let stream = ctx.stream(&MESSAGE_STREAM).await?;

        for message in &self.messages {
            stream.append(&StreamRecord::new(message.as_str()))?;
            tracing::debug!(run_id = %ctx.run_id(), %message, "Emitted");

            tokio::time::sleep(self.delay).await;
        }

        tracing::info!(run_id = %ctx.run_id(), "Finished emitting messages");

        Ok(json!({
            "success": true,
            "messagesEmitted": self.messages.len(),
        }))
    }
}
