//! joydial - a virtual dial driven by physical input.
//!
//! Reads a game controller (via gilrs) or the keyboard arrow keys and turns
//! the input into a single rotation angle, shown as a knob in an egui window
//! and published on a watch channel for other consumers.

pub mod config;
pub mod dial;
pub mod input;
pub mod ui;
