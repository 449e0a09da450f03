//! HTTP client for the relay endpoints.

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;

use crate::error::ClientError;

/// Body returned by `POST /api/start-stream`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartStreamResponse {
    run_id: String,
}

/// HTTP client for one relay server.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    /// * `base_url` - e.g. `http://localhost:4000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Trigger the producer and return the run id.
    pub async fn start_stream(&self) -> Result<String, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/start-stream", self.base_url))
            .send()
            .await?;

        let response = Self::check_status(response, "start stream").await?;
        let body: StartStreamResponse = response.json().await?;
        Ok(body.run_id)
    }

    /// Open the NDJSON body of a run as a stream of raw chunks.
    pub async fn subscribe(
        &self,
        run_id: &str,
    ) -> Result<BoxStream<'static, Result<Bytes, reqwest::Error>>, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/subscribe-stream/{run_id}", self.base_url))
            .send()
            .await?;

        let response = Self::check_status(response, "subscribe to stream").await?;
        Ok(response.bytes_stream().boxed())
    }

    async fn check_status(
        response: reqwest::Response,
        action: &'static str,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| json["error"].as_str().map(str::to_owned))
            .unwrap_or(body);

        Err(ClientError::Status {
            action,
            status,
            detail,
        })
    }
}
