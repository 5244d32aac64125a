//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Probes the extraction engine
//! - Starts the HTTP server with graceful shutdown support

use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use ytdlp_api::config::{AppState, Config};
use ytdlp_api::extractor::YtDlp;
use ytdlp_api::route::create_app;

/// Application entry point
///
/// This asynchronous main function:
/// 1. Loads environment variables from .env file
/// 2. Reads configuration (see [`Config::from_env`])
/// 3. Checks that the extraction engine can be started
/// 4. Creates the application state and router
/// 5. Starts the HTTP server with graceful shutdown handling
#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ytdlp_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    if config.allowed_api_keys.is_empty() {
        tracing::warn!("ALLOW_API_KEYS is empty, every request will be rejected");
    }

    let extractor = YtDlp::new(config.extractor_binary.clone());
    match extractor.version().await {
        Ok(version) => tracing::info!(program = extractor.program(), %version, "extractor available"),
        Err(err) => tracing::warn!(program = extractor.program(), error = %err, "extractor unavailable"),
    }

    let port = config.port;
    let state = AppState::new(config, Arc::new(extractor));

    // Create the Axum router with all routes configured
    let app = create_app(state).layer(TraceLayer::new_for_http());

    // Bind to all network interfaces on the specified port
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await.unwrap();

    println!("🚀 Server running at http://localhost:{}", port);

    // Client addresses are needed by the request logger
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .unwrap();
}

/// Handles graceful shutdown signals
///
/// Returns once SIGINT (Ctrl+C) or, on Unix, SIGTERM is received. In-flight
/// requests are allowed to complete; running extractions are killed when
/// their futures are dropped.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    println!("\n🛑 Shutdown signal received, stopping server.");
}
