//! Focus Timer - A Pomodoro focus timer server
//! 
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    services::{HttpSessionStore, InMemorySessionStore, SessionStore},
    state::AppState,
    tasks::timer_log_task,
    timer::FocusTimer,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, store={}",
          config.host, config.port, config.store_url.as_deref().unwrap_or("in-process"));

    // Session records hosted by this server
    let records = Arc::new(InMemorySessionStore::new());

    // The timer reports to a remote record API when one is configured
    let store: Arc<dyn SessionStore> = match &config.store_url {
        Some(url) => Arc::new(HttpSessionStore::new(url.as_str(), config.store_timeout())?),
        None => records.clone(),
    };
    let timer = FocusTimer::new(store);

    // Log timer transitions in the background
    tokio::spawn(timer_log_task(timer.subscribe()));

    let state = Arc::new(AppState::new(
        timer.clone(),
        records,
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer                  - Current timer state");
    info!("  POST /timer/start            - Start or resume a session");
    info!("  POST /timer/pause            - Pause the running session");
    info!("  POST /timer/resume           - Resume the paused session");
    info!("  POST /timer/stop             - Abandon the current session");
    info!("  POST /timer/reset            - Rewind the countdown");
    info!("  PUT  /timer/session-kind     - Choose work/short_break/long_break");
    info!("  PUT  /timer/task             - Choose the task to attribute");
    info!("  *    /api/pomodoro[/:id]     - Session records");
    info!("  GET  /api/pomodoro/stats/*   - Session statistics");
    info!("  GET  /health                 - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    timer.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
