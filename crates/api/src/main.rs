use std::net::SocketAddr;
use std::sync::Arc;

use relay_api::config::ServerConfig;
use relay_api::router::build_app_router;
use relay_api::state::AppState;
use relay_events::LocalTaskRunner;
use relay_worker::{EmitMessages, WorkerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_api=debug,relay_events=info,relay_worker=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let worker_config = WorkerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        stream_timeout_secs = config.stream_timeout_secs,
        emit_delay_secs = worker_config.emit_delay.as_secs(),
        message_count = worker_config.messages.len(),
        "Loaded server configuration",
    );

    // --- Task runner ---
    let runner = Arc::new(
        LocalTaskRunner::new(config.task_max_duration()).register(EmitMessages::new(&worker_config)),
    );
    let retention_job = runner.spawn_retention(config.run_retention());
    tracing::info!("Task runner started");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        runner: runner.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Backend server running");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    runner.shutdown();
    if let Err(e) = retention_job.await {
        tracing::error!(error = %e, "Run retention job panicked");
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
