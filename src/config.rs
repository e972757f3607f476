//! Application configuration loaded from `~/.config/joydial/config.toml`.
//!
//! Follows a fail-safe approach: a missing file is replaced by a written
//! default, and a corrupted file degrades to defaults with a warning. The
//! default input mode is deliberately `Unset` so that a freshly installed
//! joydial refuses to start until the user picks a mode.

use crate::dial::strategy::InputMode;
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Dial behavior and input tuning.
///
/// `stick_deadzone` and `stick_sensitivity` apply to the thumbstick axes only;
/// the trigger axes are compared against zero downstream and get no deadzone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialConfig {
    /// Which input drives the dial. `Unset` is a configuration fault.
    pub mode: InputMode,

    /// Degrees added to the accumulator per frame while a step input is held.
    pub step_amount: f32,

    /// Thumbstick deadzone as a fraction (0.0-1.0).
    pub stick_deadzone: f32,

    /// Multiplier applied to thumbstick axes after deadzone rescaling.
    pub stick_sensitivity: f32,

    /// Invert the horizontal stick axis.
    pub invert_x: bool,

    /// Invert the vertical stick axis.
    pub invert_y: bool,

    /// Interval between input snapshots in milliseconds (one dial frame).
    pub snapshot_interval_ms: u64,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            mode: InputMode::Unset,
            step_amount: 1.0,
            stick_deadzone: 0.5,
            stick_sensitivity: 1.0,
            invert_x: false,
            invert_y: false,
            snapshot_interval_ms: 16,
        }
    }
}

/// Path of the config file, `None` when the platform has no config directory.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("joydial").join("config.toml"))
}

/// Writes a default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let path = config_path().ok_or_else(|| eyre!("no config directory on this platform"))?;

    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rendered = toml::to_string_pretty(&DialConfig::default())?;
    std::fs::write(&path, rendered)?;
    info!("Wrote default config to {}", path.display());
    Ok(())
}

/// Loads the config, creating a default file first when missing.
///
/// A file that fails to parse is reported and replaced by in-memory defaults
/// so the rest of startup can still run (and then fail loudly on the unset
/// mode, which is the right error for the user to see).
pub fn load_or_init() -> Result<DialConfig> {
    ensure_default_config()?;
    let path = config_path().ok_or_else(|| eyre!("no config directory on this platform"))?;

    let raw = std::fs::read_to_string(&path)?;
    match toml::from_str::<DialConfig>(&raw) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        Err(e) => {
            warn!("Failed to parse {}: {} - using defaults", path.display(), e);
            Ok(DialConfig::default())
        }
    }
}
