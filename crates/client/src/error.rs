/// Errors from the relay HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The relay answered with a non-2xx status.
    #[error("Failed to {action}: {status} ({detail})")]
    Status {
        /// What the client was attempting, e.g. `"start stream"`.
        action: &'static str,
        status: reqwest::StatusCode,
        /// The `error` field of the JSON body, or the raw body.
        detail: String,
    },
}
