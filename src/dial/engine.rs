//! Dial engine with statum state machine for strategy execution
//!
//! Implements a 5-state lifecycle around one mode strategy. The engine runs
//! in its own tokio task, consumes one `InputSnapshot` per dial frame and
//! publishes `DialOutput` on a watch channel.
//!
//! # State Machine
//!
//! ```text
//! Initializing ──► Configured ──► Active ──► Deactivating ──► Deactivated
//!                     │              │           ▲
//!                     └──────────────┘           │
//!                       (activate/deactivate)    │
//!                                              (shutdown)
//! ```
//!
//! # Frame contract
//!
//! Each snapshot passes through, in order: reset/resume hotkeys, the
//! response-active gate, the mode strategy, the lock action. A frame that
//! changes nothing publishes nothing.

use crate::dial::state::{angle_from_rotation, normalize_degrees, AngleState};
use crate::dial::strategy::{AngleSample, AngleStrategy, InputMode};
use crate::dial::{DialError, DialOutput};
use crate::input::InputSnapshot;
use statum::{machine, state};
use std::time::SystemTime;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// States for dial engine lifecycle using statum
#[state]
#[derive(Debug, Clone)]
pub enum DialEngineState {
    Initializing, // Setting up engine structure
    Configured,   // Strategy loaded and validated
    Active,       // Processing frames in main loop
    Deactivating, // Shutting down gracefully
    Deactivated,  // Fully stopped, ready for cleanup
}

/// Dial engine with compile-time state safety via statum
///
/// Wraps one strategy trait object and manages its lifecycle through
/// distinct states. Owns the angle state; strategies only describe movement.
#[machine]
pub struct DialEngine<S: DialEngineState> {
    input_receiver: mpsc::Receiver<InputSnapshot>,
    output_sender: watch::Sender<DialOutput>,
    mode: InputMode,
    name: String,
    strategy: Option<Box<dyn AngleStrategy>>,
    state: AngleState,
    knob_rotation_degrees: f32,
}

impl<S: DialEngineState> DialEngine<S> {
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The angle state as of the last processed frame.
    pub fn angle_state(&self) -> &AngleState {
        &self.state
    }
}

impl DialEngine<Initializing> {
    pub fn create(
        input_receiver: mpsc::Receiver<InputSnapshot>,
        output_sender: watch::Sender<DialOutput>,
        mode: InputMode,
        name: String,
    ) -> Self {
        info!("Initializing new dial engine: {}", name);

        Self::new(
            input_receiver,
            output_sender,
            mode,
            name,
            None,                 // strategy
            AngleState::default(), // response active, accumulator zero
            0.0,                  // knob_rotation_degrees
        )
    }

    /// Configures the engine with a strategy and transitions to Configured.
    ///
    /// The strategy was created from the configured mode, so an `Unset` mode
    /// never reaches this point; it fails at strategy creation instead.
    pub fn configure(
        mut self,
        mut strategy: Box<dyn AngleStrategy>,
    ) -> Result<DialEngine<Configured>, DialError> {
        info!("Configuring dial engine: {} ({})", self.name, strategy.mode());

        match strategy.initialize() {
            Ok(_) => {
                debug!("Strategy initialized successfully");
                self.strategy = Some(strategy);
                info!("Engine configured successfully: {}", self.name);
                Ok(self.transition())
            }
            Err(e) => {
                error!("Failed to initialize strategy: {}", e);
                Err(DialError::InitializationError(format!(
                    "Failed to initialize strategy: {}",
                    e
                )))
            }
        }
    }
}

impl DialEngine<Configured> {
    pub fn activate(self) -> DialEngine<Active> {
        info!("Activating dial engine: {}", self.name);
        self.transition()
    }
}

impl DialEngine<Active> {
    /// Processes one input frame through the dial contract.
    ///
    /// Returns the output to publish, `None` when the frame changed nothing
    /// (locked dial, released thumbstick), or `DialError::ModeUnset` when no
    /// strategy is present - in which case nothing is mutated.
    pub fn process_frame(
        &mut self,
        snapshot: &InputSnapshot,
    ) -> Result<Option<DialOutput>, DialError> {
        let mut status = None;
        let mut changed = false;

        // Hotkeys run before the active gate so reset and resume still work
        // on a locked dial
        if snapshot.reset_pressed {
            self.state.reset();
            self.state.current_angle_degrees = angle_from_rotation(0.0);
            self.knob_rotation_degrees = 0.0;
            status = Some("reset: dial angle cleared".to_string());
            changed = true;
            debug!("Reset input received, accumulator cleared");
        }

        if snapshot.resume_pressed && !self.state.response_active {
            self.state.response_active = true;
            status = Some("resumed: dial accepting input again".to_string());
            changed = true;
            info!("Dial resumed: {}", self.name);
        }

        if !self.state.response_active {
            // Locked: the frame is a no-op apart from hotkey effects
            if changed {
                return Ok(Some(self.compose_output(status)));
            }
            return Ok(None);
        }

        let strategy = self.strategy.as_mut().ok_or(DialError::ModeUnset)?;

        match strategy.sample(snapshot) {
            Some(AngleSample::Stepped { delta_degrees }) => {
                self.state.accumulated_degrees += delta_degrees;
                self.knob_rotation_degrees = normalize_degrees(self.state.accumulated_degrees);
                self.state.current_angle_degrees =
                    angle_from_rotation(self.knob_rotation_degrees);
                changed = true;
            }
            Some(AngleSample::Absolute { angle_degrees }) => {
                self.state.current_angle_degrees = angle_degrees;
                self.knob_rotation_degrees = -angle_degrees;
                changed = true;
            }
            None => {}
        }

        if snapshot.confirm_pressed {
            info!(
                "Dial angle locked: {:.1} degrees",
                self.state.current_angle_degrees
            );
            self.state.response_active = false;
            // The knob and accumulator snap back; the published angle keeps
            // the locked value until a reset hotkey clears it
            self.state.reset();
            self.knob_rotation_degrees = 0.0;
            status = Some("angle locked - resume input starts over".to_string());
            changed = true;
        }

        if changed {
            Ok(Some(self.compose_output(status)))
        } else {
            Ok(None)
        }
    }

    fn compose_output(&self, status: Option<String>) -> DialOutput {
        DialOutput {
            response_active: self.state.response_active,
            angle_degrees: self.state.current_angle_degrees,
            knob_rotation_degrees: self.knob_rotation_degrees,
            status,
            timestamp: SystemTime::now(),
        }
    }

    /// Sends an output to the watch channel
    pub fn publish(&self, output: DialOutput) -> Result<(), DialError> {
        self.output_sender.send(output).map_err(|e| {
            DialError::ChannelError(format!("Failed to publish dial output: {}", e))
        })
    }

    /// Main processing loop with graceful shutdown support
    ///
    /// Runs until the shutdown signal or the snapshot channel closes.
    /// Individual frame errors are reported and do not stop the loop.
    pub async fn run_until_shutdown(
        mut self,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<DialEngine<Deactivating>, DialError> {
        info!("Starting frame processing loop for: {}", self.name);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received for: {}", self.name);
                    break;
                }

                maybe_snapshot = self.input_receiver.recv() => {
                    match maybe_snapshot {
                        Some(snapshot) => match self.process_frame(&snapshot) {
                            Ok(Some(output)) => {
                                if let Err(e) = self.publish(output) {
                                    warn!("Failed to publish dial output: {}", e);
                                }
                            }
                            Ok(None) => {}
                            Err(e) => {
                                error!("Error processing frame: {}", e);
                            }
                        },
                        None => {
                            warn!("Snapshot channel closed, stopping engine: {}", self.name);
                            break;
                        }
                    }
                }
            }
        }

        info!("Transitioning to Deactivating state: {}", self.name);
        Ok(self.transition())
    }

    pub fn deactivate(self) -> DialEngine<Deactivating> {
        info!("Deactivating dial engine: {}", self.name);
        self.transition()
    }
}

impl DialEngine<Deactivating> {
    /// Shuts down the strategy and transitions to Deactivated
    pub fn shutdown(mut self) -> DialEngine<Deactivated> {
        info!("Shutting down dial engine: {}", self.name);

        if let Some(strategy) = &mut self.strategy {
            debug!("Shutting down strategy");
            strategy.shutdown();
        }

        info!("Engine shut down successfully: {}", self.name);
        self.transition()
    }
}

impl DialEngine<Deactivated> {}

/// Handle for managing a dial engine in a tokio task
///
/// Provides lifecycle management for the engine running in a background
/// task: spawning, graceful shutdown, resource cleanup.
#[derive(Debug)]
pub struct DialEngineHandle {
    pub mode: InputMode,

    pub name: String,

    task_handle: Option<JoinHandle<Result<(), DialError>>>,

    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl DialEngineHandle {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            name: mode.to_string(),
            task_handle: None,
            shutdown_tx: None,
        }
    }

    /// Starts the engine in a tokio task and returns communication channels
    ///
    /// # Returns
    ///
    /// * Watch receiver for published dial output
    /// * Input sender for snapshot frames
    pub fn start(
        &mut self,
        strategy: Box<dyn AngleStrategy>,
    ) -> Result<(watch::Receiver<DialOutput>, mpsc::Sender<InputSnapshot>), DialError> {
        let (snapshot_sender, snapshot_receiver) = mpsc::channel(100);
        let (output_sender, output_receiver) = watch::channel(DialOutput::default());
        let engine_name = self.name.clone();

        let engine = DialEngine::create(
            snapshot_receiver,
            output_sender,
            self.mode,
            engine_name.clone(),
        )
        .configure(strategy)?;

        let active_engine = engine.activate();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);
        let task_handle = tokio::spawn(async move {
            info!("Spawning running engine: {}", engine_name);
            match active_engine.run_until_shutdown(shutdown_rx).await {
                Ok(deactivating_engine) => {
                    info!("Engine entering deactivating state: {}", engine_name);
                    let _ = deactivating_engine.shutdown();
                    Ok(())
                }
                Err(e) => {
                    error!("Error running engine: {} - {}", engine_name, e);
                    Err(e)
                }
            }
        });

        self.task_handle = Some(task_handle);

        info!("Dial engine activated: {} ({})", self.name, self.mode);
        Ok((output_receiver, snapshot_sender))
    }

    /// Gracefully shuts down the engine and waits for task completion
    pub async fn shutdown(&mut self) -> Result<(), DialError> {
        debug!("Sending shutdown signal to engine: {}", self.name);

        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                warn!("Engine task already terminated: {}", self.name);
            }
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => {
                    debug!("Engine task completed: {}", self.name);
                    result
                }
                Err(e) => {
                    error!("Engine task panicked: {} - {}", self.name, e);
                    Err(DialError::TaskError(format!(
                        "Engine task panicked: {}",
                        e
                    )))
                }
            }
        } else {
            debug!("Engine already shut down: {}", self.name);
            Ok(())
        }
    }
}
