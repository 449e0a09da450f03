use std::time::Duration;

/// Messages emitted when `EMIT_MESSAGES` is not set.
pub const DEFAULT_MESSAGES: [&str; 20] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

/// Producer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Message texts, emitted in order.
    pub messages: Vec<String>,
    /// Pause after each emission.
    pub emit_delay: Duration,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default           |
    /// |-------------------|-------------------|
    /// | `EMIT_MESSAGES`   | `one,two,…,twenty`|
    /// | `EMIT_DELAY_SECS` | `2`               |
    pub fn from_env() -> Self {
        let messages = std::env::var("EMIT_MESSAGES")
            .map(|raw| parse_messages(&raw))
            .unwrap_or_else(|_| DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect());

        let emit_delay_secs: u64 = std::env::var("EMIT_DELAY_SECS")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("EMIT_DELAY_SECS must be a valid u64");

        Self {
            messages,
            emit_delay: Duration::from_secs(emit_delay_secs),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
            emit_delay: Duration::from_secs(2),
        }
    }
}

fn parse_messages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
