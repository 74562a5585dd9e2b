// Spin wheel entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Pick the audio cue sink
// 4. Create mpsc channels and the application state
// 5. Spawn the controller task
// 6. Run the terminal view until the user quits
// 7. Wait for the controller to stop

use spinwheel_app::app;
use spinwheel_core::config;
use spinwheel_tui::{audio, tui};

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Spin wheel starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: mode={:?}, animation={}ms, tick={}ms",
        config.draw.mode, config.draw.animation_ms, config.draw.tick_ms
    );

    // 3. Audio cue sink
    let cues = audio::build_sink(&config.audio);

    // 4. Channels and state
    let (seq_tx, seq_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let effects = config.effects.clone();
    let app_state = app::AppState::new(config, cues, seq_tx);

    // 5. Spawn the controller
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, seq_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the view (blocks until the user quits)
    info!("Application ready");
    if let Err(e) = tui::run(ui_rx, cmd_tx, effects).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: dropping cmd_tx stops the controller; give it a moment.
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Spin wheel shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the view).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("spinwheel.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("spinwheel=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
