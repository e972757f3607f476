//! Trait definitions and mode selection for angle sampling strategies.

use crate::config::DialConfig;
use crate::dial::arrows::ArrowKeysStrategy;
use crate::dial::error::DialError;
use crate::dial::thumbstick::ThumbstickStrategy;
use crate::dial::triggers::TriggerButtonsStrategy;
use crate::input::InputSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Which physical input drives the dial. Selected once at configuration time;
/// `Unset` is an error state, never a silent default mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputMode {
    /// Not configured. Strategy creation fails on this variant.
    #[default]
    Unset,

    /// Keyboard arrow keys or D-pad, one step per held frame.
    ArrowKeys,

    /// Left analog stick, continuous angle from the stick direction.
    AnalogThumbstick,

    /// Analog triggers, one step per frame while a trigger is pulled.
    TriggerButtons,
}

impl Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Unset => write!(f, "Unset"),
            InputMode::ArrowKeys => write!(f, "ArrowKeys"),
            InputMode::AnalogThumbstick => write!(f, "AnalogThumbstick"),
            InputMode::TriggerButtons => write!(f, "TriggerButtons"),
        }
    }
}

impl InputMode {
    /// Creates the sampling strategy for this mode.
    ///
    /// This is the only place mode dispatch happens; the engine only ever
    /// sees the trait object.
    pub fn create_strategy(
        self,
        config: &DialConfig,
    ) -> Result<Box<dyn AngleStrategy>, DialError> {
        match self {
            InputMode::Unset => Err(DialError::ModeUnset),
            InputMode::ArrowKeys => Ok(Box::new(ArrowKeysStrategy::new(config.step_amount))),
            InputMode::AnalogThumbstick => Ok(Box::new(ThumbstickStrategy::new())),
            InputMode::TriggerButtons => {
                Ok(Box::new(TriggerButtonsStrategy::new(config.step_amount)))
            }
        }
    }
}

/// One frame's worth of angle movement produced by a strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleSample {
    /// Add this delta to the accumulator; the angle derives from it.
    /// Stepped modes emit this every frame, delta zero included.
    Stepped { delta_degrees: f32 },

    /// Set the angle directly; the knob rotates to its negation.
    Absolute { angle_degrees: f32 },
}

/// A per-mode sampling strategy.
///
/// Strategies read the snapshot and describe the movement; they never touch
/// the angle state themselves, so the frame contract stays in one place.
pub trait AngleStrategy: Send + 'static {
    /// Samples one input frame. `None` means "no update this frame"
    /// (a released thumbstick, not a stick pointing at angle zero).
    fn sample(&mut self, snapshot: &InputSnapshot) -> Option<AngleSample>;

    /// Initializes the strategy before the engine activates.
    fn initialize(&mut self) -> Result<(), DialError> {
        Ok(())
    }

    /// Shuts the strategy down cleanly.
    fn shutdown(&mut self) {}

    /// The mode this strategy implements.
    fn mode(&self) -> InputMode;
}
