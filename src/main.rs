//! Tickdown - A state-managed HTTP server for countdown and break timers
//!
//! This is the main entry point for the tickdown application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use tickdown::{
    api::create_router,
    config::Config,
    services::{check_speech_available, SpeechAnnouncer},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tickdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting tickdown server v1.0.0");
    info!(
        "Configuration: host={}, port={}, speech={}",
        config.host,
        config.port,
        if config.quiet { "off" } else { config.speech_command.as_str() }
    );

    // Speech is optional; a missing command degrades to log-only announcements
    let announcer = if config.quiet {
        SpeechAnnouncer::silent()
    } else {
        match check_speech_available(&config.speech_command).await {
            Ok(()) => SpeechAnnouncer::new(config.speech_command.clone()),
            Err(e) => {
                info!("{}", e);
                SpeechAnnouncer::silent()
            }
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), announcer));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start  - Start a countdown (duration fields or start/end clock)");
    info!("  POST /cancel - Cancel the active countdown");
    info!("  GET  /status - Current phase, remaining time and display state");
    info!("  GET  /health - Health check");

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

    // Stop any ticking session before exiting
    if state.clear_session().unwrap_or(false) {
        info!("Cancelled active session on shutdown");
    }

    info!("Server shutdown complete");
    Ok(())
}
