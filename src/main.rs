//! joydial - Main Entry
//!
//! Wires the input pipeline to the dial engine and the UI: gamepad and
//! keyboard events are folded into per-frame snapshots, the engine turns
//! them into a dial angle, and the window shows the knob.

use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use joydial::config;
use joydial::dial::engine::DialEngineHandle;
use joydial::input::{CollectorHandle, CollectorSettings, SnapshotHandle, SnapshotSettings};
use joydial::ui::JoydialApp;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config = config::load_or_init()?;
    info!("Dial configuration: {:?}", config);

    // Strategy selection happens once, here. An unset mode stops the whole
    // application rather than guessing a default.
    let strategy = config
        .mode
        .create_strategy(&config)
        .map_err(|e| eyre!("Cannot start dial: {}", e))?;

    // Raw events from the gamepad collector and the UI keyboard capture
    let (raw_event_sender, raw_event_receiver) = mpsc::channel(1000);

    let collector_settings = CollectorSettings {
        stick_deadzone: config.stick_deadzone,
        stick_sensitivity: config.stick_sensitivity,
        invert_x: config.invert_x,
        invert_y: config.invert_y,
    };
    let _collector_handle =
        CollectorHandle::spawn(Some(collector_settings), raw_event_sender.clone())
            .map_err(|e| eyre!("Failed to spawn collector: {}", e))?;

    // Dial engine task, publishing on a watch channel
    let mut engine_handle = DialEngineHandle::new(config.mode);
    let (output_receiver, snapshot_sender) = engine_handle
        .start(strategy)
        .map_err(|e| eyre!("Failed to start dial engine: {}", e))?;

    // Snapshot stage folds raw events into one frame per interval
    let snapshot_settings = SnapshotSettings {
        interval_ms: config.snapshot_interval_ms,
    };
    let _snapshot_handle = SnapshotHandle::spawn(
        raw_event_receiver,
        snapshot_sender,
        Some(snapshot_settings),
    )
    .map_err(|e| eyre!("Failed to spawn snapshot stage: {}", e))?;

    info!("Starting UI with mode {}", config.mode);
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::Vec2::new(480.0, 560.0))
        .with_title("joydial");

    let mode = config.mode;
    eframe::run_native(
        "joydial",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(JoydialApp::new(
                cc,
                output_receiver,
                raw_event_sender,
                mode,
            )))
        }),
    )
    .map_err(|e| eyre!("UI terminated with error: {}", e))?;

    engine_handle.shutdown().await?;
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
