//! Named Timers - A multi-timer countdown manager served over HTTP
//!
//! This is the main entry point for the named-timers application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use named_timers::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{change_log_task, ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("named_timers={},tower_http=info", config.log_level()))
        .init();

    info!("Starting named-timers server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, default duration={}s, tick={}ms",
          config.host, config.port, config.default_duration, config.tick_ms);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.default_duration));

    // Start the background tasks
    tokio::spawn(ticker_task(Arc::clone(&state), config.tick_period()));
    tokio::spawn(change_log_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers                  - List timers (?group_active_first=false for by-name)");
    info!("  POST   /timers                  - Add a timer");
    info!("  GET    /timers/:name            - Show a timer");
    info!("  POST   /timers/:name/rename     - Rename a timer");
    info!("  POST   /timers/:name/toggle     - Pause or resume a timer");
    info!("  DELETE /timers/:name            - Remove a timer (?force=true if still active)");
    info!("  POST   /clear-finished          - Remove all finished timers");
    info!("  GET    /status                  - Counts and server status");
    info!("  GET    /health                  - Health check");

    // Setup graceful shutdown
    let shutdown = async {
        match shutdown_signal().await {
            Ok(_) => info!("Shutdown signal received"),
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
        tracing::error!("Server error: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
