use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Time allowed to produce response headers, in seconds (default: `30`).
    /// Streaming bodies are not bounded by this.
    pub request_timeout_secs: u64,
    /// Longest wait for a single stream payload, in seconds (default: `60`).
    pub stream_timeout_secs: u64,
    /// Longest a triggered run may execute, in seconds (default: `120`).
    pub task_max_duration_secs: u64,
    /// How long a finished run with unread streams is kept, in seconds
    /// (default: `600`).
    pub run_retention_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `4000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `STREAM_TIMEOUT_SECS`    | `60`                    |
    /// | `TASK_MAX_DURATION_SECS` | `120`                   |
    /// | `RUN_RETENTION_SECS`     | `600`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_secs("REQUEST_TIMEOUT_SECS", 30);
        let stream_timeout_secs = env_secs("STREAM_TIMEOUT_SECS", 60);
        let task_max_duration_secs = env_secs("TASK_MAX_DURATION_SECS", 120);
        let run_retention_secs = env_secs("RUN_RETENTION_SECS", 600);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            stream_timeout_secs,
            task_max_duration_secs,
            run_retention_secs,
        }
    }

    pub fn stream_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_timeout_secs)
    }

    pub fn task_max_duration(&self) -> Duration {
        Duration::from_secs(self.task_max_duration_secs)
    }

    pub fn run_retention(&self) -> Duration {
        Duration::from_secs(self.run_retention_secs)
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    }
}
