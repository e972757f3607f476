//! Input pipeline: raw event collection and per-frame snapshot building.
//!
//! Two stages, each in its own tokio task:
//! raw gilrs (and UI keyboard) events flow into an mpsc queue, and the
//! snapshot stage folds them into one `InputSnapshot` per dial frame.

pub mod collector;
pub mod snapshot;

pub use collector::{CollectorError, CollectorHandle, CollectorSettings};
pub use snapshot::{InputSnapshot, SnapshotError, SnapshotHandle, SnapshotSettings};

use chrono::{DateTime, Local};

/// An input that has meaning for the dial, independent of which physical
/// control produced it. Gamepad buttons and keyboard keys both map here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialAction {
    /// Step the dial counter-clockwise (left arrow, D-pad left, left trigger).
    Decrease,
    /// Step the dial clockwise (right arrow, D-pad right, right trigger).
    Increase,
    /// Lock the current angle (Enter, south button).
    Confirm,
    /// Clear the accumulator and snap the knob back (R, select button).
    Reset,
    /// Accept input again after a lock (X, start button).
    Resume,
}

/// Trigger axis side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerSide {
    Left,
    Right,
}

/// Press state of a button-like input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Raw input event with a precise chrono timestamp.
///
/// Produced by the gilrs collector and by the UI's keyboard capture; both
/// feed the same queue.
#[derive(Debug, Clone)]
pub enum RawInputEvent {
    StickMove {
        x: f32,
        y: f32,
        timestamp: DateTime<Local>,
    },
    TriggerMove {
        trigger: TriggerSide,
        value: f32,
        timestamp: DateTime<Local>,
    },
    ButtonChange {
        action: DialAction,
        state: ButtonState,
        timestamp: DateTime<Local>,
    },
}
