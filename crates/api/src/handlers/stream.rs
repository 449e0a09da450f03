//! Handlers for the stream relay endpoints.
//!
//! `POST /api/start-stream` triggers the `emit-messages` task and returns
//! its run id. `GET /api/subscribe-stream/{run_id}` relays that run's
//! message stream as NDJSON, one line per payload, flushed per line.

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::header;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use futures::stream::{self, Stream};
use relay_core::ndjson::{relay_payload, LineKind, NDJSON_CONTENT_TYPE};
use relay_core::schema::MESSAGE_STREAM;
use relay_events::{open_stream, PayloadStream, RunId, StreamReadError};
use relay_worker::EMIT_MESSAGES_TASK;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of a successful trigger.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartStreamResponse {
    pub run_id: RunId,
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// POST /api/start-stream
///
/// Start the producer task. Returns `{"runId": "..."}`.
pub async fn start_stream(State(state): State<AppState>) -> AppResult<Json<StartStreamResponse>> {
    tracing::info!("Starting stream task");

    let handle = state
        .runner
        .trigger(EMIT_MESSAGES_TASK, serde_json::json!({}))
        .await
        .map_err(AppError::ProducerUnavailable)?;

    tracing::info!(run_id = %handle.id, task_id = %handle.task_id, "Task triggered");

    Ok(Json(StartStreamResponse { run_id: handle.id }))
}

// ---------------------------------------------------------------------------
// Subscribe
// ---------------------------------------------------------------------------

/// GET /api/subscribe-stream/{run_id}
///
/// Relay the run's message stream as a chunked NDJSON body. Failure to open
/// the stream is a 500; a read timeout or read error after that aborts the
/// body without a terminating chunk.
pub async fn subscribe_stream(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> AppResult<Response> {
    if run_id.trim().is_empty() {
        return Err(AppError::BadRequest("runId must not be empty".into()));
    }
    let run_id = RunId::from(run_id);

    tracing::info!(%run_id, "Subscribing to stream");

    let reader = open_stream(
        state.runner.as_ref(),
        &MESSAGE_STREAM,
        &run_id,
        state.config.stream_timeout(),
    )
    .await
    .map_err(AppError::SubscribeFailed)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
        .header(header::TRANSFER_ENCODING, "chunked")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(ndjson_lines(run_id, reader)))
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// One body frame per payload, each a complete `\n`-terminated line.
fn ndjson_lines(
    run_id: RunId,
    reader: PayloadStream,
) -> impl Stream<Item = Result<Bytes, StreamReadError>> + Send + 'static {
    stream::unfold((run_id, reader), |(run_id, mut reader)| async move {
        match reader.next_payload().await {
            Some(Ok(payload)) => {
                let line = relay_payload(&payload);
                match line.kind {
                    LineKind::Record => {
                        tracing::debug!(%run_id, bytes = line.bytes.len(), "Relayed line")
                    }
                    LineKind::Json => tracing::warn!(
                        %run_id,
                        %payload,
                        "Payload is JSON but carries no message",
                    ),
                    LineKind::Verbatim => tracing::warn!(
                        %run_id,
                        %payload,
                        "Payload is not JSON, forwarding verbatim",
                    ),
                }
                Some((Ok(line.bytes), (run_id, reader)))
            }
            Some(Err(e)) => {
                tracing::warn!(%run_id, error = %e, lines = reader.received(), "Aborting stream relay");
                Some((Err(e), (run_id, reader)))
            }
            None => {
                tracing::info!(%run_id, lines = reader.received(), "Stream finished");
                None
            }
        }
    })
}
