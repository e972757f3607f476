use chrono::Local;
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::input::{ButtonState, DialAction, RawInputEvent, TriggerSide};

// Collector settings
#[derive(Clone, Debug)]
pub struct CollectorSettings {
    pub stick_deadzone: f32,
    pub stick_sensitivity: f32,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            stick_deadzone: 0.5,
            stick_sensitivity: 1.0,
            invert_x: false,
            invert_y: false,
        }
    }
}

// Collector errors
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),

    #[error("Failed to send event: {0}")]
    EventSendError(String),
}

#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

#[machine]
pub struct EventCollector<S: CollectionState> {
    // Gilrs context
    gilrs: Gilrs,

    // Active gamepad
    active_gamepad: Option<GamepadId>,

    // Collector settings
    settings: CollectorSettings,

    // Channel for sending events to the snapshot stage
    event_sender: mpsc::Sender<RawInputEvent>,

    // Last seen stick values so each StickMove carries a full position
    last_stick_x: f32,
    last_stick_y: f32,
}

impl<S: CollectionState> EventCollector<S> {
    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }
}

impl EventCollector<Initializing> {
    pub fn create(
        settings: Option<CollectorSettings>,
        event_sender: mpsc::Sender<RawInputEvent>,
    ) -> Result<Self, CollectorError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating Event Collector with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(
            gilrs,
            None,
            settings,
            event_sender,
            0.0, // last_stick_x
            0.0, // last_stick_y
        ))
    }

    // Select a gamepad and transition to Collecting state
    pub fn initialize(mut self) -> Result<EventCollector<Collecting>, CollectorError> {
        info!(
            "Initializing Event Collector with stick deadzone: {}",
            self.settings.stick_deadzone
        );

        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, keyboard input still works");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
                info!("  [{}] ID: {}, Name: {}", idx, id, gamepad.name());
            }
            let (id, gamepad) = &gamepads[0];
            self.active_gamepad = Some(*id);
            info!("Selected gamepad: {} ({})", gamepad.name(), id);
        }

        info!("Event Collector initialized, transitioning to Collecting state");
        Ok(self.transition())
    }
}

impl EventCollector<Collecting> {
    // Collect a single event and send it to the queue
    pub fn collect_next_event(&mut self) -> Result<(), CollectorError> {
        if let Some(Event {
            id, event, time, ..
        }) = self.gilrs.next_event()
        {
            if let Some(active_id) = self.active_gamepad {
                if id != active_id {
                    debug!("Skipping event from non-active gamepad: {:?}", id);
                    return Ok(());
                }
            }

            debug!("Processing gilrs event: {:?} at time: {:?}", event, time);

            if let Some(raw_event) = self.convert_gilrs_event(event) {
                match &raw_event {
                    RawInputEvent::ButtonChange {
                        action,
                        state,
                        timestamp,
                    } => {
                        info!(
                            "Button event: {:?} {:?} at {}",
                            action,
                            state,
                            timestamp.format("%H:%M:%S.%3f")
                        );
                    }
                    _ => debug!("Captured event: {:?}", raw_event),
                }

                match self.event_sender.try_send(raw_event) {
                    Ok(_) => debug!("Event sent to snapshot queue"),
                    Err(e) => {
                        error!("Failed to send event to snapshot stage: {}", e);
                        return Err(CollectorError::EventSendError(e.to_string()));
                    }
                }
            } else {
                debug!("Event ignored due to filtering or mapping");
            }
        }

        Ok(())
    }

    // Run the collector in a loop
    pub fn run_collection_loop(&mut self) -> Result<(), CollectorError> {
        info!("Starting Event Collector loop");

        let mut event_count = 0;
        let mut last_log_time = Local::now();
        let log_interval = chrono::Duration::seconds(10);

        loop {
            if let Err(e) = self.collect_next_event() {
                error!("Error collecting event: {}", e);
                // Keep the loop alive despite send errors
            } else {
                event_count += 1;
            }

            let now = Local::now();
            if now - last_log_time > log_interval {
                debug!(
                    "Event Collector stats: {} polls in last {} seconds",
                    event_count,
                    log_interval.num_seconds()
                );
                event_count = 0;
                last_log_time = now;
            }

            // Small sleep to prevent 100% CPU usage
            std::thread::sleep(std::time::Duration::from_micros(100));
        }
    }

    // Convert a gilrs event to a dial input event
    fn convert_gilrs_event(&mut self, event: EventType) -> Option<RawInputEvent> {
        let now = Local::now();

        match event {
            EventType::AxisChanged(axis, value, _) => {
                debug!("Axis changed: {:?} = {:.4}", axis, value);

                match axis {
                    Axis::LeftStickX => {
                        let new_value = self.condition_stick_value(value, self.settings.invert_x);
                        let raw_event = RawInputEvent::StickMove {
                            x: new_value,
                            y: self.last_stick_y,
                            timestamp: now,
                        };
                        self.last_stick_x = new_value;
                        Some(raw_event)
                    }
                    Axis::LeftStickY => {
                        let new_value = self.condition_stick_value(value, self.settings.invert_y);
                        let raw_event = RawInputEvent::StickMove {
                            x: self.last_stick_x,
                            y: new_value,
                            timestamp: now,
                        };
                        self.last_stick_y = new_value;
                        Some(raw_event)
                    }
                    // Trigger axes pass through raw: the trigger mode treats
                    // any value above zero as active, no deadzone
                    Axis::LeftZ => Some(RawInputEvent::TriggerMove {
                        trigger: TriggerSide::Left,
                        value,
                        timestamp: now,
                    }),
                    Axis::RightZ => Some(RawInputEvent::TriggerMove {
                        trigger: TriggerSide::Right,
                        value,
                        timestamp: now,
                    }),
                    _ => {
                        debug!("Ignoring unsupported axis: {:?}", axis);
                        None
                    }
                }
            }
            EventType::ButtonPressed(button, _) => map_button(button).map(|action| {
                debug!("Button pressed, mapped to action: {:?}", action);
                RawInputEvent::ButtonChange {
                    action,
                    state: ButtonState::Pressed,
                    timestamp: now,
                }
            }),
            EventType::ButtonReleased(button, _) => map_button(button).map(|action| {
                debug!("Button released, mapped to action: {:?}", action);
                RawInputEvent::ButtonChange {
                    action,
                    state: ButtonState::Released,
                    timestamp: now,
                }
            }),
            EventType::ButtonRepeated(button, _) => {
                debug!("Button repeat ignored: {:?}", button);
                None
            }
            EventType::Connected => {
                info!("Controller connected event detected");
                None
            }
            EventType::Disconnected => {
                warn!("Controller disconnected event detected");
                None
            }
            _ => {
                debug!("Unhandled event type: {:?}", event);
                None
            }
        }
    }

    fn condition_stick_value(&self, value: f32, invert: bool) -> f32 {
        let value = apply_deadzone(value, self.settings.stick_deadzone);
        let value = (value * self.settings.stick_sensitivity).clamp(-1.0, 1.0);
        if invert {
            -value
        } else {
            value
        }
    }
}

// Public interface for spawning and running the collector
pub struct CollectorHandle {
    event_sender: mpsc::Sender<RawInputEvent>,
}

impl CollectorHandle {
    // Create a new collector and spawn it as a tokio task
    pub fn spawn(
        settings: Option<CollectorSettings>,
        event_sender: mpsc::Sender<RawInputEvent>,
    ) -> Result<Self, CollectorError> {
        info!("Spawning Event Collector with settings: {:?}", settings);

        let sender_clone = event_sender.clone();
        let collector = EventCollector::create(settings, event_sender)?;

        tokio::spawn(async move {
            match collector.initialize() {
                Ok(mut collecting_state) => {
                    info!("Event Collector initialization successful, starting collection loop");
                    if let Err(e) = collecting_state.run_collection_loop() {
                        error!("Collector task terminated with error: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to initialize Event Collector: {}", e);
                }
            }
        });

        info!("Event Collector successfully started");
        Ok(Self {
            event_sender: sender_clone,
        })
    }

    // Get a sender for raw events (the UI uses this for keyboard input)
    pub fn event_sender(&self) -> mpsc::Sender<RawInputEvent> {
        self.event_sender.clone()
    }
}

// Map a gilrs button to a dial action
fn map_button(button: Button) -> Option<DialAction> {
    match button {
        Button::DPadLeft => Some(DialAction::Decrease),
        Button::DPadRight => Some(DialAction::Increase),
        Button::South => Some(DialAction::Confirm),
        Button::Select => Some(DialAction::Reset),
        Button::Start => Some(DialAction::Resume),
        _ => None,
    }
}

// Apply deadzone to analog stick values, rescaling the live range
fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        let sign = if value < 0.0 { -1.0 } else { 1.0 };
        sign * (value.abs() - deadzone) / (1.0 - deadzone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_zeroes_small_values() {
        assert_eq!(apply_deadzone(0.3, 0.5), 0.0);
        assert_eq!(apply_deadzone(-0.49, 0.5), 0.0);
    }

    #[test]
    fn deadzone_rescales_live_range() {
        // Full deflection survives as full deflection
        assert_eq!(apply_deadzone(1.0, 0.5), 1.0);
        assert_eq!(apply_deadzone(-1.0, 0.5), -1.0);
        // Halfway through the live range maps to 0.5
        let v = apply_deadzone(0.75, 0.5);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn button_map_covers_dial_actions() {
        assert_eq!(map_button(Button::DPadLeft), Some(DialAction::Decrease));
        assert_eq!(map_button(Button::DPadRight), Some(DialAction::Increase));
        assert_eq!(map_button(Button::South), Some(DialAction::Confirm));
        assert_eq!(map_button(Button::Select), Some(DialAction::Reset));
        assert_eq!(map_button(Button::Start), Some(DialAction::Resume));
        assert_eq!(map_button(Button::North), None);
    }
}
