//! Route definitions for the stream relay.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stream;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// POST   /start-stream                -> start_stream
/// GET    /subscribe-stream/{run_id}   -> subscribe_stream
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start-stream", post(stream::start_stream))
        .route("/subscribe-stream/{run_id}", get(stream::subscribe_stream))
}
