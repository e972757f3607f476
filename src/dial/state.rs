//! Angle state and the degree math shared by all modes.

/// Mutable dial state, owned by the engine and mutated once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleState {
    /// Signed, unbounded accumulator for the stepped modes.
    pub accumulated_degrees: f32,

    /// Last computed display angle in degrees, `[0, 360)`.
    pub current_angle_degrees: f32,

    /// Gates whether frames are accepted. Cleared by the lock action,
    /// restored by the resume hotkey.
    pub response_active: bool,
}

impl Default for AngleState {
    fn default() -> Self {
        Self {
            accumulated_degrees: 0.0,
            current_angle_degrees: 0.0,
            response_active: true,
        }
    }
}

impl AngleState {
    /// Clears the accumulator. The published angle is left alone on purpose:
    /// the lock action resets the knob without retracting the angle it locked.
    pub fn reset(&mut self) {
        self.accumulated_degrees = 0.0;
    }
}

/// Wraps an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Display angle for a knob rotation: `normalize(360 - rotation)`.
///
/// The knob rotates counter-clockwise for positive values while the readout
/// counts clockwise, hence the flip.
pub fn angle_from_rotation(rotation_degrees: f32) -> f32 {
    normalize_degrees(360.0 - normalize_degrees(rotation_degrees))
}
