//! Countdown Bell - a countdown timer that rings an alarm clip
//! 
//! This is the main entry point for the countdown-bell application.

use std::{sync::Arc, time::Duration};
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use countdown_bell::{
    api::create_router,
    audio::{output_backend, AudioBackend, AudioReference, PlayerState},
    config::Config,
    state::{AppState, TimerInput, TimerPhase},
    timer::{render_countdown, TimerController},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_bell={},tower_http=info", config.log_level()))
        .init();

    let backend = output_backend(config.volume()).context("Failed to initialize audio output")?;

    match &config.command {
        Some(command) => run_countdown(backend, command.input(), config.sound.clone()).await,
        None => serve(backend, &config).await,
    }
}

/// Run the HTTP control surface until a shutdown signal arrives
async fn serve(backend: Arc<dyn AudioBackend>, config: &Config) -> anyhow::Result<()> {
    info!("Starting countdown-bell server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, volume={}",
          config.host, config.port, config.volume());

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), backend));
    if config.sound.is_some() {
        state.select_audio(config.sound.clone())?;
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /input  - Set hours, minutes and seconds");
    info!("  POST /sound  - Select the alarm sound");
    info!("  POST /start  - Start the countdown");
    info!("  POST /stop   - Stop the countdown and alarm");
    info!("  GET  /status - Check the countdown");
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

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}

/// Count down in the terminal, ring once and wait for the clip to end
async fn run_countdown(
    backend: Arc<dyn AudioBackend>,
    input: TimerInput,
    sound: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    let controller = TimerController::new(backend);
    let audio = AudioReference::from_selection(sound);

    controller.start(input.total_seconds(), &audio)?;

    let finished = async {
        let last = render_countdown(controller.subscribe()).await;
        if last.phase == TimerPhase::Expired {
            println!("Time's up!");
            let mut poll = tokio::time::interval(Duration::from_millis(100));
            while controller.player_state() == PlayerState::Playing {
                poll.tick().await;
            }
            if let Some(e) = controller.player_error() {
                warn!("Alarm could not be played: {}", e);
            }
        }
    };

    tokio::select! {
        _ = finished => {}
        _ = shutdown_signal() => {
            info!("Interrupted, stopping timer");
        }
    }

    controller.shutdown();
    Ok(())
}
