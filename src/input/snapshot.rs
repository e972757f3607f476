use chrono::Local;
use statum::{machine, state};
use std::time::SystemTime;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::input::{ButtonState, DialAction, RawInputEvent, TriggerSide};

/// One dial frame worth of input, folded from the raw event queue.
///
/// Held inputs (`stick_*`, triggers, `decrease_held`/`increase_held`) are
/// levels that persist across frames until the matching release arrives.
/// `confirm_pressed`/`reset_pressed`/`resume_pressed` are edges: true for
/// exactly one snapshot after the input is released, mirroring the key-up
/// semantics the dial actions were designed around.
#[derive(Debug, Clone)]
pub struct InputSnapshot {
    pub stick_x: f32,
    pub stick_y: f32,
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub decrease_held: bool,
    pub increase_held: bool,
    pub confirm_pressed: bool,
    pub reset_pressed: bool,
    pub resume_pressed: bool,
    pub timestamp: SystemTime,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            stick_x: 0.0,
            stick_y: 0.0,
            left_trigger: 0.0,
            right_trigger: 0.0,
            decrease_held: false,
            increase_held: false,
            confirm_pressed: false,
            reset_pressed: false,
            resume_pressed: false,
            timestamp: SystemTime::now(),
        }
    }
}

// Event batch for the folding state
#[derive(Debug, Clone)]
pub struct EventBatch {
    pub events: Vec<RawInputEvent>,
}

// Snapshot stage settings
#[derive(Clone, Debug)]
pub struct SnapshotSettings {
    pub interval_ms: u64,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self { interval_ms: 16 }
    }
}

// Snapshot stage errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to receive events: {0}")]
    EventReceiveError(String),

    #[error("Failed to publish snapshot: {0}")]
    PublishError(String),
}

#[state]
#[derive(Debug, Clone)]
pub enum SnapshotState {
    Waiting,
    Folding(EventBatch),
    Publishing,
}

#[machine]
pub struct SnapshotBuilder<S: SnapshotState> {
    // Receiver for raw events from collector and UI keyboard capture
    event_receiver: mpsc::Receiver<RawInputEvent>,

    // Sender for finished snapshots, one per dial frame
    snapshot_sender: mpsc::Sender<InputSnapshot>,

    // Stage settings
    settings: SnapshotSettings,

    // Current fold state carried between frames
    current: InputSnapshot,
}

impl<S: SnapshotState> SnapshotBuilder<S> {
    pub fn settings(&self) -> &SnapshotSettings {
        &self.settings
    }
}

impl SnapshotBuilder<Waiting> {
    pub fn create(
        event_receiver: mpsc::Receiver<RawInputEvent>,
        snapshot_sender: mpsc::Sender<InputSnapshot>,
        settings: Option<SnapshotSettings>,
    ) -> Self {
        let settings = settings.unwrap_or_default();
        info!("Creating Snapshot Builder with settings: {:?}", settings);

        Self::new(
            event_receiver,
            snapshot_sender,
            settings,
            InputSnapshot::default(),
        )
    }

    // Drain the raw event queue and move to the folding state
    pub fn collect(mut self) -> Result<SnapshotBuilder<Folding>, SnapshotError> {
        let mut events = Vec::new();

        loop {
            match self.event_receiver.try_recv() {
                Ok(event) => {
                    debug!("Received event from queue: {:?}", event);
                    events.push(event);
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    error!("Raw event channel disconnected");
                    return Err(SnapshotError::EventReceiveError(
                        "raw event channel disconnected".to_string(),
                    ));
                }
            }
        }

        if !events.is_empty() {
            debug!("Collected batch of {} events for folding", events.len());
        }

        Ok(self.transition_with(EventBatch { events }))
    }
}

impl SnapshotBuilder<Folding> {
    // Fold the batch into the current snapshot and move to publishing
    pub fn fold(mut self) -> Result<SnapshotBuilder<Publishing>, SnapshotError> {
        let events = match self.get_state_data() {
            Some(batch) => batch.events.clone(),
            None => {
                warn!("No event batch found in state data, this should not happen");
                Vec::new()
            }
        };

        for event in &events {
            match event {
                RawInputEvent::StickMove { x, y, .. } => {
                    self.current.stick_x = *x;
                    self.current.stick_y = *y;
                }
                RawInputEvent::TriggerMove { trigger, value, .. } => match trigger {
                    TriggerSide::Left => self.current.left_trigger = *value,
                    TriggerSide::Right => self.current.right_trigger = *value,
                },
                RawInputEvent::ButtonChange { action, state, .. } => {
                    let held = *state == ButtonState::Pressed;
                    match action {
                        DialAction::Decrease => self.current.decrease_held = held,
                        DialAction::Increase => self.current.increase_held = held,
                        // One-shot actions fire on release, like key-up
                        DialAction::Confirm if !held => self.current.confirm_pressed = true,
                        DialAction::Reset if !held => self.current.reset_pressed = true,
                        DialAction::Resume if !held => self.current.resume_pressed = true,
                        _ => {}
                    }
                }
            }
        }

        Ok(self.transition())
    }
}

impl SnapshotBuilder<Publishing> {
    // Publish the snapshot and return to the waiting state
    pub fn publish(mut self) -> Result<SnapshotBuilder<Waiting>, SnapshotError> {
        self.current.timestamp = SystemTime::now();

        match self.snapshot_sender.try_send(self.current.clone()) {
            Ok(_) => debug!("Snapshot published"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Snapshot channel full, dropping frame");
            }
            Err(e) => {
                error!("Failed to publish snapshot: {}", e);
                return Err(SnapshotError::PublishError(e.to_string()));
            }
        }

        // Edge flags are consumed by one frame
        self.current.confirm_pressed = false;
        self.current.reset_pressed = false;
        self.current.resume_pressed = false;

        Ok(self.transition())
    }
}

// Public interface for spawning and running the snapshot stage
pub struct SnapshotHandle {}

impl SnapshotHandle {
    // Create a new snapshot builder and spawn it as a tokio task
    pub fn spawn(
        event_receiver: mpsc::Receiver<RawInputEvent>,
        snapshot_sender: mpsc::Sender<InputSnapshot>,
        settings: Option<SnapshotSettings>,
    ) -> Result<Self, SnapshotError> {
        info!("Spawning Snapshot Builder with settings: {:?}", settings);

        let builder = SnapshotBuilder::create(event_receiver, snapshot_sender, settings);

        tokio::spawn(async move {
            info!("Snapshot Builder task started");
            if let Err(e) = run_snapshot_loop(builder).await {
                error!("Snapshot task terminated with error: {}", e);
            }
        });

        info!("Snapshot Builder successfully started");
        Ok(Self {})
    }
}

// Run the snapshot loop at the configured frame interval
async fn run_snapshot_loop(
    mut builder: SnapshotBuilder<Waiting>,
) -> Result<(), SnapshotError> {
    let interval_ms = builder.settings().interval_ms;
    info!("Starting snapshot loop with {}ms interval", interval_ms);

    let mut interval_timer =
        tokio::time::interval(tokio::time::Duration::from_millis(interval_ms));

    loop {
        interval_timer.tick().await;

        let folding = builder.collect()?;
        let publishing = folding.fold()?;
        builder = publishing.publish()?;
    }
}
