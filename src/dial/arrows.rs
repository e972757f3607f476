//! Arrow-key stepping strategy.
//!
//! One step per frame while a key is held; usable without any controller
//! attached. Left (decrease) steps the knob counter-clockwise, right
//! (increase) clockwise; both held at once cancel out for that frame.

use crate::dial::strategy::{AngleSample, AngleStrategy, InputMode};
use crate::dial::DialError;
use crate::input::InputSnapshot;
use tracing::debug;

pub struct ArrowKeysStrategy {
    step_amount: f32,
}

impl ArrowKeysStrategy {
    pub fn new(step_amount: f32) -> Self {
        Self { step_amount }
    }
}

impl AngleStrategy for ArrowKeysStrategy {
    fn sample(&mut self, snapshot: &InputSnapshot) -> Option<AngleSample> {
        let mut delta = 0.0;
        if snapshot.decrease_held {
            delta += self.step_amount;
        }
        if snapshot.increase_held {
            delta -= self.step_amount;
        }

        if delta != 0.0 {
            debug!("Arrow step: {:+.2} degrees", delta);
        }

        // Stepped modes publish every active frame, even a zero delta
        Some(AngleSample::Stepped {
            delta_degrees: delta,
        })
    }

    fn initialize(&mut self) -> Result<(), DialError> {
        debug!("Arrow keys strategy ready, step amount {}", self.step_amount);
        Ok(())
    }

    fn mode(&self) -> InputMode {
        InputMode::ArrowKeys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(decrease: bool, increase: bool) -> InputSnapshot {
        InputSnapshot {
            decrease_held: decrease,
            increase_held: increase,
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn decrease_steps_positive() {
        let mut strategy = ArrowKeysStrategy::new(1.5);
        let sample = strategy.sample(&snapshot(true, false)).unwrap();
        assert_eq!(sample, AngleSample::Stepped { delta_degrees: 1.5 });
    }

    #[test]
    fn increase_steps_negative() {
        let mut strategy = ArrowKeysStrategy::new(1.5);
        let sample = strategy.sample(&snapshot(false, true)).unwrap();
        assert_eq!(sample, AngleSample::Stepped { delta_degrees: -1.5 });
    }

    #[test]
    fn both_keys_cancel_out() {
        let mut strategy = ArrowKeysStrategy::new(1.5);
        let sample = strategy.sample(&snapshot(true, true)).unwrap();
        assert_eq!(sample, AngleSample::Stepped { delta_degrees: 0.0 });
    }

    #[test]
    fn idle_frame_still_samples() {
        let mut strategy = ArrowKeysStrategy::new(1.5);
        // no key held still produces a (zero) sample so the frame publishes
        assert!(strategy.sample(&snapshot(false, false)).is_some());
    }
}
