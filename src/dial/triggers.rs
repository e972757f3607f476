//! Trigger-button stepping strategy.
//!
//! Same accumulation as the arrow keys, driven by the two analog trigger
//! axes. A trigger counts as active at any value above zero; this mode has
//! no deadzone.

use crate::dial::strategy::{AngleSample, AngleStrategy, InputMode};
use crate::dial::DialError;
use crate::input::InputSnapshot;
use tracing::debug;

pub struct TriggerButtonsStrategy {
    step_amount: f32,
}

impl TriggerButtonsStrategy {
    pub fn new(step_amount: f32) -> Self {
        Self { step_amount }
    }
}

impl AngleStrategy for TriggerButtonsStrategy {
    fn sample(&mut self, snapshot: &InputSnapshot) -> Option<AngleSample> {
        let mut delta = 0.0;
        if snapshot.left_trigger > 0.0 {
            delta += self.step_amount;
        }
        if snapshot.right_trigger > 0.0 {
            delta -= self.step_amount;
        }

        if delta != 0.0 {
            debug!("Trigger step: {:+.2} degrees", delta);
        }

        Some(AngleSample::Stepped {
            delta_degrees: delta,
        })
    }

    fn initialize(&mut self) -> Result<(), DialError> {
        debug!("Trigger strategy ready, step amount {}", self.step_amount);
        Ok(())
    }

    fn mode(&self) -> InputMode {
        InputMode::TriggerButtons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(left: f32, right: f32) -> InputSnapshot {
        InputSnapshot {
            left_trigger: left,
            right_trigger: right,
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn any_positive_pull_counts() {
        let mut strategy = TriggerButtonsStrategy::new(1.0);
        // no deadzone in this mode: the faintest pull steps
        let sample = strategy.sample(&snapshot(0.01, 0.0)).unwrap();
        assert_eq!(sample, AngleSample::Stepped { delta_degrees: 1.0 });
    }

    #[test]
    fn right_trigger_steps_negative() {
        let mut strategy = TriggerButtonsStrategy::new(1.0);
        let sample = strategy.sample(&snapshot(0.0, 0.8)).unwrap();
        assert_eq!(sample, AngleSample::Stepped { delta_degrees: -1.0 });
    }

    #[test]
    fn both_triggers_cancel_out() {
        let mut strategy = TriggerButtonsStrategy::new(1.0);
        let sample = strategy.sample(&snapshot(0.6, 0.9)).unwrap();
        assert_eq!(sample, AngleSample::Stepped { delta_degrees: 0.0 });
    }

    #[test]
    fn released_triggers_still_sample() {
        let mut strategy = TriggerButtonsStrategy::new(1.0);
        let sample = strategy.sample(&snapshot(0.0, 0.0)).unwrap();
        assert_eq!(sample, AngleSample::Stepped { delta_degrees: 0.0 });
    }
}
