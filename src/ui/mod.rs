//! joydial user interface.
//!
//! One eframe window in a three-panel layout: a top panel naming the active
//! mode, a central panel painting the knob, and a bottom status bar. The UI is a pure reader of the engine's watch channel; its
//! only output is keyboard capture, forwarded into the same raw-event queue
//! the gamepad collector feeds, so arrow keys work without a controller.

pub mod common;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Vec2};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::dial::strategy::InputMode;
use crate::dial::DialOutput;
use crate::input::{ButtonState, DialAction, RawInputEvent};
use common::UiColors;

/// Keyboard bindings for dial actions.
///
/// Arrow keys step the dial, Enter locks, R resets, X resumes.
fn map_key(key: egui::Key) -> Option<DialAction> {
    match key {
        egui::Key::ArrowLeft => Some(DialAction::Decrease),
        egui::Key::ArrowRight => Some(DialAction::Increase),
        egui::Key::Enter => Some(DialAction::Confirm),
        egui::Key::R => Some(DialAction::Reset),
        egui::Key::X => Some(DialAction::Resume),
        _ => None,
    }
}

pub struct JoydialApp {
    /// Latest dial output from the engine
    output_receiver: watch::Receiver<DialOutput>,

    /// Keyboard events forwarded to the input pipeline
    event_sender: mpsc::Sender<RawInputEvent>,

    /// Configured mode, shown in the header
    mode: InputMode,

    /// Last activity message, retained until the next one arrives
    activity_message: String,
}

impl JoydialApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        output_receiver: watch::Receiver<DialOutput>,
        event_sender: mpsc::Sender<RawInputEvent>,
        mode: InputMode,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        JoydialApp {
            output_receiver,
            event_sender,
            mode,
            activity_message: String::new(),
        }
    }

    /// Lifts keyboard events out of egui's input state into the raw event
    /// queue. Repeats are dropped; the snapshot stage tracks held state from
    /// the press/release edges.
    fn forward_key_events(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            if let egui::Event::Key {
                key,
                pressed,
                repeat,
                ..
            } = event
            {
                if repeat {
                    continue;
                }
                let Some(action) = map_key(key) else { continue };
                let state = if pressed {
                    ButtonState::Pressed
                } else {
                    ButtonState::Released
                };
                let raw_event = RawInputEvent::ButtonChange {
                    action,
                    state,
                    timestamp: chrono::Local::now(),
                };
                debug!("Forwarding key event: {:?} {:?}", action, state);
                if let Err(e) = self.event_sender.try_send(raw_event) {
                    warn!("Failed to forward key event: {}", e);
                }
            }
        }
    }

    fn paint_knob(&self, ui: &mut egui::Ui, output: &DialOutput) {
        let side = ui.available_height().min(ui.available_width()) - 20.0;
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(side.max(80.0)), Sense::hover());
        let painter = ui.painter_at(rect);

        let center = rect.center();
        let radius = rect.width() * 0.38;

        painter.circle(
            center,
            radius,
            UiColors::INNER_BG,
            Stroke::new(2.0, UiColors::BORDER),
        );

        // Tick at the top marks angle zero
        let top = center + common::pointer_direction(0.0) * radius;
        let tick_inner = center + common::pointer_direction(0.0) * (radius - 8.0);
        painter.line_segment([tick_inner, top], Stroke::new(2.0, UiColors::BORDER));

        let pointer_color = if output.response_active {
            UiColors::POINTER
        } else {
            UiColors::INACTIVE
        };
        let tip = center + common::pointer_direction(output.knob_rotation_degrees) * radius;
        painter.line_segment([center, tip], Stroke::new(3.0, pointer_color));
        painter.circle_filled(center, 4.0, pointer_color);

        painter.text(
            center + Vec2::new(0.0, radius + 18.0),
            Align2::CENTER_CENTER,
            format!("{:.1}°", output.angle_degrees),
            FontId::proportional(22.0),
            Color32::WHITE,
        );
    }
}

impl eframe::App for JoydialApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.forward_key_events(ctx);

        let output = self.output_receiver.borrow().clone();
        if let Some(status) = &output.status {
            if *status != self.activity_message {
                self.activity_message = status.clone();
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.ctx().request_repaint_after(Duration::from_millis(16));

            egui::TopBottomPanel::top("top_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        ui.heading("joydial");
                        ui.label(format!("mode: {}", self.mode));
                    });
                });

            egui::CentralPanel::default().show_inside(ui, |ui| {
                common::create_frame(UiColors::MAIN_BG, UiColors::BORDER).show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        self.paint_knob(ui, &output);
                        if !self.activity_message.is_empty() {
                            ui.label(&self.activity_message);
                        }
                    });
                });
            });

            egui::TopBottomPanel::bottom("bottom_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    let (status_icon, status_color) = if output.response_active {
                        ("accepting input", UiColors::ACTIVE)
                    } else {
                        ("locked", UiColors::INACTIVE)
                    };
                    ui.horizontal_centered(|ui| {
                        ui.colored_label(status_color, status_icon);
                        ui.label(format!("angle: {:.1}°", output.angle_degrees));
                    });
                });
        });
    }
}
