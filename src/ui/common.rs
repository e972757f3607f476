//! Shared UI styling for the joydial window.

use eframe::egui::{self, Color32, Frame, Stroke};

/// Creates a styled frame with consistent visual parameters.
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}

/// Centralized color palette for the joydial dark theme.
///
/// Uses associated constants rather than a color struct to avoid runtime
/// allocation. Organized from darkest to lightest background, with semantic
/// colors for the accepting/locked indicator.
pub struct UiColors;

impl UiColors {
    /// Primary background color for main content areas
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Secondary background color for nested components
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Border color for component separation
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Knob pointer and tick marks
    pub const POINTER: Color32 = Color32::from_rgb(220, 220, 220);

    /// Accepting-input status indicator - green
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Locked status indicator - red
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);
}

/// Converts a knob rotation in degrees to the screen-space direction of the
/// pointer tip. Zero points up; positive rotations turn counter-clockwise,
/// matching a rotation about the display normal.
pub fn pointer_direction(rotation_degrees: f32) -> egui::Vec2 {
    let theta = rotation_degrees.to_radians();
    // Screen y grows downward, hence both components negated from math coords
    egui::Vec2::new(-theta.sin(), -theta.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rotation_points_up() {
        let dir = pointer_direction(0.0);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn positive_rotation_turns_counter_clockwise() {
        // +90 degrees takes the pointer from up to left on screen
        let dir = pointer_direction(90.0);
        assert!((dir.x + 1.0).abs() < 1e-5);
        assert!(dir.y.abs() < 1e-5);
    }

    #[test]
    fn negated_stick_angle_points_where_the_stick_does() {
        // Stick pushed east: angle 90, knob rotation -90, pointer east
        let dir = pointer_direction(-90.0);
        assert!((dir.x - 1.0).abs() < 1e-5);
        assert!(dir.y.abs() < 1e-5);
    }
}
