//! Dial Regression Tests
//!
//! Scenario tests for the input-to-angle contract, driven through the public
//! library API. These pin the observable behavior of the dial: step
//! accumulation, the trigonometric stick mapping, lock/resume gating, and
//! the deliberate lock quirk (knob resets, published angle does not).
//!
//! # Running tests
//! ```bash
//! cargo test --test dial_regression
//! ```

use joydial::config::DialConfig;
use joydial::dial::engine::{Active, DialEngine};
use joydial::dial::strategy::InputMode;
use joydial::dial::{DialError, DialOutput};
use joydial::input::snapshot::InputSnapshot;
use tokio::sync::{mpsc, watch};

// ==================== HELPERS ====================

/// Builds an engine in the Active state for the given mode and step amount.
fn active_engine(mode: InputMode, step_amount: f32) -> DialEngine<Active> {
    let config = DialConfig {
        step_amount,
        ..DialConfig::default()
    };
    let strategy = mode.create_strategy(&config).expect("mode must be set");
    let (_snapshot_tx, snapshot_rx) = mpsc::channel(8);
    let (output_tx, _output_rx) = watch::channel(DialOutput::default());
    DialEngine::create(snapshot_rx, output_tx, mode, mode.to_string())
        .configure(strategy)
        .expect("strategy initialization is infallible here")
        .activate()
}

fn frame() -> InputSnapshot {
    InputSnapshot::default()
}

fn decrease_frame() -> InputSnapshot {
    InputSnapshot {
        decrease_held: true,
        ..frame()
    }
}

fn increase_frame() -> InputSnapshot {
    InputSnapshot {
        increase_held: true,
        ..frame()
    }
}

fn stick_frame(x: f32, y: f32) -> InputSnapshot {
    InputSnapshot {
        stick_x: x,
        stick_y: y,
        ..frame()
    }
}

fn confirm_frame() -> InputSnapshot {
    InputSnapshot {
        confirm_pressed: true,
        ..frame()
    }
}

fn reset_frame() -> InputSnapshot {
    InputSnapshot {
        reset_pressed: true,
        ..frame()
    }
}

fn resume_frame() -> InputSnapshot {
    InputSnapshot {
        resume_pressed: true,
        ..frame()
    }
}

/// Runs the same snapshot through the engine N times, returning the last
/// published output.
fn run_frames(
    engine: &mut DialEngine<Active>,
    snapshot: &InputSnapshot,
    frames: usize,
) -> Option<DialOutput> {
    let mut last = None;
    for _ in 0..frames {
        if let Some(output) = engine.process_frame(snapshot).expect("frame must process") {
            last = Some(output);
        }
    }
    last
}

// ==================== STEPPED MODES ====================

#[test]
fn test_decrease_30_frames_reads_330() {
    let mut engine = active_engine(InputMode::ArrowKeys, 1.0);

    let output = run_frames(&mut engine, &decrease_frame(), 30).unwrap();

    assert_eq!(engine.angle_state().accumulated_degrees, 30.0);
    assert_eq!(output.angle_degrees, 330.0);
}

#[test]
fn test_step_accumulation_is_frame_count_times_step() {
    // N frames at step s separate the two directions by exactly 2*N*s
    const N: usize = 24;
    const STEP: f32 = 2.5;

    let mut decreasing = active_engine(InputMode::ArrowKeys, STEP);
    let mut increasing = active_engine(InputMode::ArrowKeys, STEP);

    run_frames(&mut decreasing, &decrease_frame(), N);
    run_frames(&mut increasing, &increase_frame(), N);

    let spread = decreasing.angle_state().accumulated_degrees
        - increasing.angle_state().accumulated_degrees;
    assert_eq!(spread, 2.0 * N as f32 * STEP);
}

#[test]
fn test_trigger_mode_matches_arrow_accumulation() {
    let mut arrows = active_engine(InputMode::ArrowKeys, 1.0);
    let mut triggers = active_engine(InputMode::TriggerButtons, 1.0);

    let pull_left = InputSnapshot {
        left_trigger: 0.4,
        ..frame()
    };

    let arrow_out = run_frames(&mut arrows, &decrease_frame(), 15).unwrap();
    let trigger_out = run_frames(&mut triggers, &pull_left, 15).unwrap();

    assert_eq!(arrow_out.angle_degrees, trigger_out.angle_degrees);
    assert_eq!(
        arrows.angle_state().accumulated_degrees,
        triggers.angle_state().accumulated_degrees
    );
}

// ==================== THUMBSTICK MODE ====================

#[test]
fn test_stick_east_reads_90_north_reads_180() {
    let mut engine = active_engine(InputMode::AnalogThumbstick, 1.0);

    let east = run_frames(&mut engine, &stick_frame(1.0, 0.0), 1).unwrap();
    assert!((east.angle_degrees - 90.0).abs() < 1e-4);

    let north = run_frames(&mut engine, &stick_frame(0.0, 1.0), 1).unwrap();
    assert!((north.angle_degrees - 180.0).abs() < 1e-4);
    assert!((north.knob_rotation_degrees + 180.0).abs() < 1e-4);
}

#[test]
fn test_released_stick_changes_nothing() {
    let mut engine = active_engine(InputMode::AnalogThumbstick, 1.0);

    let before = run_frames(&mut engine, &stick_frame(0.6, 0.6), 1).unwrap();

    // (0, 0) is "stick released", not "stick at angle zero"
    let after = engine.process_frame(&stick_frame(0.0, 0.0)).unwrap();
    assert!(after.is_none());
    assert_eq!(
        engine.angle_state().current_angle_degrees,
        before.angle_degrees
    );
}

// ==================== LOCK / RESUME ====================

#[test]
fn test_lock_keeps_published_angle_but_resets_knob() {
    let mut engine = active_engine(InputMode::ArrowKeys, 1.0);
    run_frames(&mut engine, &decrease_frame(), 60);

    let locked = run_frames(&mut engine, &confirm_frame(), 1).unwrap();

    assert!(!locked.response_active);
    assert_eq!(locked.knob_rotation_degrees, 0.0);
    // The lock quirk: the published angle survives the reset
    assert_eq!(locked.angle_degrees, 300.0);
    assert_eq!(engine.angle_state().accumulated_degrees, 0.0);
}

#[test]
fn test_locked_dial_ignores_input_until_resume() {
    let mut engine = active_engine(InputMode::ArrowKeys, 1.0);
    run_frames(&mut engine, &confirm_frame(), 1);

    // Locked: stepping produces no output and no state change
    assert!(run_frames(&mut engine, &decrease_frame(), 10).is_none());
    assert_eq!(engine.angle_state().accumulated_degrees, 0.0);

    // Resume reopens the dial in the same frame
    let resumed = run_frames(&mut engine, &resume_frame(), 1).unwrap();
    assert!(resumed.response_active);

    let output = run_frames(&mut engine, &decrease_frame(), 10).unwrap();
    assert_eq!(output.angle_degrees, 350.0);
}

// ==================== RESET ====================

#[test]
fn test_reset_is_idempotent() {
    let mut engine = active_engine(InputMode::ArrowKeys, 1.0);
    run_frames(&mut engine, &decrease_frame(), 45);

    let once = run_frames(&mut engine, &reset_frame(), 1).unwrap();
    let twice = run_frames(&mut engine, &reset_frame(), 1).unwrap();

    assert_eq!(once.angle_degrees, 0.0);
    assert_eq!(once.knob_rotation_degrees, 0.0);
    assert_eq!(twice.angle_degrees, once.angle_degrees);
    assert_eq!(twice.knob_rotation_degrees, once.knob_rotation_degrees);
    assert_eq!(engine.angle_state().accumulated_degrees, 0.0);
}

#[test]
fn test_reset_clears_a_locked_angle_readout() {
    let mut engine = active_engine(InputMode::ArrowKeys, 1.0);
    run_frames(&mut engine, &decrease_frame(), 30);
    let locked = run_frames(&mut engine, &confirm_frame(), 1).unwrap();
    assert_eq!(locked.angle_degrees, 330.0);

    // The reset hotkey works while locked and republishes angle zero,
    // without reopening the dial
    let reset = run_frames(&mut engine, &reset_frame(), 1).unwrap();
    assert_eq!(reset.angle_degrees, 0.0);
    assert!(!reset.response_active);
}

// ==================== CONFIGURATION FAULTS ====================

#[test]
fn test_unset_mode_refuses_to_configure() {
    let config = DialConfig::default();
    assert!(matches!(
        InputMode::Unset.create_strategy(&config),
        Err(DialError::ModeUnset)
    ));
}
