//! Analog thumbstick strategy.
//!
//! Continuous mapping from stick direction to dial angle. The stick axes
//! arrive deadzoned and sensitivity-scaled from the collector; a reading of
//! exactly (0, 0) means "stick released" and produces no update at all,
//! never "stick at angle zero".

use crate::dial::strategy::{AngleSample, AngleStrategy, InputMode};
use crate::dial::DialError;
use crate::input::InputSnapshot;
use tracing::debug;

pub struct ThumbstickStrategy {}

impl ThumbstickStrategy {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ThumbstickStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AngleStrategy for ThumbstickStrategy {
    fn sample(&mut self, snapshot: &InputSnapshot) -> Option<AngleSample> {
        let (x, y) = (snapshot.stick_x, snapshot.stick_y);

        if x == 0.0 && y == 0.0 {
            return None;
        }

        // atan2(x, y) puts zero at north and grows clockwise with x; the
        // 180-degree shift orients the readout so a pushed stick points the
        // knob where the hand expects it
        let angle_degrees = 180.0 - x.atan2(y).to_degrees();
        debug!(
            "Stick ({:.3}, {:.3}) -> {:.1} degrees",
            x, y, angle_degrees
        );

        Some(AngleSample::Absolute { angle_degrees })
    }

    fn initialize(&mut self) -> Result<(), DialError> {
        debug!("Thumbstick strategy ready");
        Ok(())
    }

    fn mode(&self) -> InputMode {
        InputMode::AnalogThumbstick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot {
            stick_x: x,
            stick_y: y,
            ..InputSnapshot::default()
        }
    }

    fn sampled_angle(x: f32, y: f32) -> f32 {
        let mut strategy = ThumbstickStrategy::new();
        match strategy.sample(&snapshot(x, y)) {
            Some(AngleSample::Absolute { angle_degrees }) => angle_degrees,
            other => panic!("expected absolute sample, got {:?}", other),
        }
    }

    #[test]
    fn released_stick_skips_the_frame() {
        let mut strategy = ThumbstickStrategy::new();
        assert!(strategy.sample(&snapshot(0.0, 0.0)).is_none());
    }

    #[test]
    fn cardinal_directions_map_exactly() {
        assert!((sampled_angle(1.0, 0.0) - 90.0).abs() < 1e-4);
        assert!((sampled_angle(0.0, 1.0) - 180.0).abs() < 1e-4);
        assert!((sampled_angle(-1.0, 0.0) - 270.0).abs() < 1e-4);
        assert!((sampled_angle(0.0, -1.0) - 0.0).abs() < 1e-4);
    }

    #[test]
    fn diagonals_land_between_cardinals() {
        let angle = sampled_angle(1.0, 1.0);
        assert!((angle - 135.0).abs() < 1e-4);
    }
}
