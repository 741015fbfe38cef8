//! Countdown Bell - A countdown timer service with push notifications
//! 
//! This is the main entry point for the countdown-bell application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_bell::{
    config::Config,
    state::{AppState, SettingsStore},
    api::create_router,
    services::Notifier,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_bell={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-bell server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, desktop_notify={}",
          config.host, config.port, config.desktop_notifications());

    // Load persisted notification settings (falls back to defaults)
    let settings = SettingsStore::open(config.settings_path());
    let notifier = Notifier::new(config.endpoints());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        settings,
        notifier,
        config.desktop_notifications(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /status               - Current timer view");
    info!("  GET  /events               - Timer view stream (SSE)");
    info!("  POST /timer/duration       - Set hours/minutes/seconds");
    info!("  GET  /timer/presets        - List preset durations");
    info!("  POST /timer/presets/:label - Apply a preset");
    info!("  POST /timer/start          - Start the countdown");
    info!("  POST /timer/stop           - Stop the countdown");
    info!("  POST /timer/reset          - Reset to the configured duration");
    info!("  GET  /settings             - Notification settings");
    info!("  PUT  /settings             - Save notification settings");
    info!("  POST /settings/test        - Send a test notification");
    info!("  GET  /health               - Health check");

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

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
