pub mod health;
pub mod stream;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /start-stream                   trigger the producer (POST)
/// /subscribe-stream/{run_id}      NDJSON relay of a run's stream (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(stream::router())
}
