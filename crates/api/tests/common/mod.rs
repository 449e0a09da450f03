#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use relay_api::config::ServerConfig;
use relay_api::router::build_app_router;
use relay_api::state::AppState;
use relay_core::schema::MESSAGE_STREAM;
use relay_events::{
    LocalTaskRunner, PayloadStream, RunHandle, RunId, RunStatus, RunnerError, Task, TaskContext,
    TaskError, TaskRunner,
};
use relay_worker::EMIT_MESSAGES_TASK;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        stream_timeout_secs: 60,
        task_max_duration_secs: 120,
        run_retention_secs: 600,
    }
}

/// Build the full application router around `runner`.
pub fn build_test_app(runner: Arc<dyn TaskRunner>) -> Router {
    build_test_app_with(test_config(), runner)
}

pub fn build_test_app_with(config: ServerConfig, runner: Arc<dyn TaskRunner>) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        runner,
    };
    build_app_router(state, &config)
}

/// Producer registered as `emit-messages` that writes fixed raw payloads.
///
/// Raw payloads let tests put text on the stream that the typed writer
/// would never produce, such as `[object Object]`.
pub struct ScriptedProducer {
    pub payloads: Vec<String>,
    pub delay: Duration,
}

#[async_trait]
impl Task for ScriptedProducer {
    fn id(&self) -> &'static str {
        EMIT_MESSAGES_TASK
    }

    async fn run(
        &self,
        ctx: TaskContext,
        _payload: serde_json::Value,
    ) -> Result<serde_json::Value, TaskError> {
        let stream = ctx.stream(&MESSAGE_STREAM).await?;
        for p in &self.payloads {
            stream.raw().append_raw(p.clone());
            tokio::time::sleep(self.delay).await;
        }
        Ok(serde_json::json!({ "success": true }))
    }
}

pub fn scripted_runner(payloads: &[&str], delay: Duration) -> Arc<LocalTaskRunner> {
    Arc::new(LocalTaskRunner::default().register(ScriptedProducer {
        payloads: payloads.iter().map(|p| p.to_string()).collect(),
        delay,
    }))
}

/// Runner whose trigger always fails, as if the task service were down.
pub struct UnavailableRunner;

#[async_trait]
impl TaskRunner for UnavailableRunner {
    async fn trigger(
        &self,
        _task_id: &str,
        _payload: serde_json::Value,
    ) -> Result<RunHandle, RunnerError> {
        Err(RunnerError::Unavailable("connection refused".into()))
    }

    async fn read_stream(
        &self,
        run_id: &RunId,
        _stream_id: &str,
        _version: u32,
        _timeout: Duration,
    ) -> Result<PayloadStream, RunnerError> {
        Err(RunnerError::RunNotFound(run_id.clone()))
    }
}

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Trigger a run through the API and return its id.
pub async fn start_run(app: &Router) -> String {
    let response = post(app.clone(), "/api/start-stream").await;
    assert_eq!(response.status(), 200);
    body_json(response).await["runId"]
        .as_str()
        .expect("runId should be a string")
        .to_string()
}

pub async fn wait_for_status(runner: &LocalTaskRunner, run_id: &str) -> RunStatus {
    let run_id = RunId::from(run_id.to_string());
    loop {
        match runner.run_status(&run_id).await {
            Some(status) if status.is_finished() => return status,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
}
