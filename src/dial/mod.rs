//! Conversion of input snapshots into a dial angle.
//!
//! A `DialEngine` holds the angle state and one mode strategy, applies the
//! per-frame contract (hotkeys, active gate, mode sampling, lock action) and
//! publishes the result as a `DialOutput` on a watch channel.

pub mod arrows;
pub mod engine;
pub mod error;
pub mod state;
pub mod strategy;
pub mod thumbstick;
pub mod triggers;

pub use engine::{DialEngine, DialEngineHandle, DialEngineState};
pub use error::DialError;
pub use state::AngleState;
pub use strategy::{AngleSample, AngleStrategy, InputMode};

use std::time::SystemTime;

/// Published dial state, one frame's worth.
///
/// This is the synchronization boundary between the engine task and any
/// number of readers (the UI included): a whole-frame value on a watch
/// channel, never a pair of loose shared variables.
#[derive(Debug, Clone)]
pub struct DialOutput {
    /// Whether the dial is currently accepting input.
    pub response_active: bool,

    /// Last computed angle in degrees. After a lock this intentionally keeps
    /// the locked value while the knob snaps back to zero.
    pub angle_degrees: f32,

    /// Rotation applied to the knob visual, degrees about the display normal.
    pub knob_rotation_degrees: f32,

    /// Human-readable activity message for the status line, cosmetic only.
    pub status: Option<String>,

    /// Timestamp of the frame that produced this output.
    pub timestamp: SystemTime,
}

impl Default for DialOutput {
    fn default() -> Self {
        Self {
            response_active: true,
            angle_degrees: 0.0,
            knob_rotation_degrees: 0.0,
            status: None,
            timestamp: SystemTime::now(),
        }
    }
}
