use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque correlation id of one task run.
///
/// Returned by [`TaskRunner::trigger`](crate::TaskRunner::trigger) and used
/// by the client to open the matching stream subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Generate a fresh, unique run id (`run_<uuid>`).
    pub fn generate() -> Self {
        Self(format!("run_{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle returned when a task run is triggered.
#[derive(Debug, Clone)]
pub struct RunHandle {
    pub id: RunId,
    pub task_id: String,
}

/// Lifecycle of a task run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    /// The run exceeded its maximum duration and was stopped.
    TimedOut,
}

impl RunStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let a = RunId::generate();
        let b = RunId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("run_"));
    }

    #[test]
    fn run_id_serializes_as_plain_string() {
        let id = RunId::from("run_abc".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"run_abc\"");
    }

    #[test]
    fn only_running_is_unfinished() {
        assert!(!RunStatus::Running.is_finished());
        assert!(RunStatus::Completed.is_finished());
        assert!(RunStatus::Failed.is_finished());
        assert!(RunStatus::TimedOut.is_finished());
    }
}
