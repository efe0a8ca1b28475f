//! This module handles the [`App`] type for the `eframe`-based GUI.

use crate::render::{color, SceneView};
use ct_animator::{Animator, CameraController};
use ct_geometry::{scene_rng, Populations, SceneConfig};
use ct_hand::HandCell;
use ct_vision::{CaptureError, ConfigError, GeminiClassifier, SignalSourceHandle};
use egui::{Align2, Color32, FontId, RichText};
use std::time::Instant;
use tracing::{error, info, instrument};

cfg_if::cfg_if! {
    if #[cfg(feature = "webcam")] {
        /// Open the webcam.
        fn open_camera() -> Result<ct_vision::Webcam, CaptureError> {
            ct_vision::Webcam::open()
        }
    } else {
        /// There's no camera support, so this always fails.
        fn open_camera() -> Result<ct_vision::NoCamera, CaptureError> {
            ct_vision::NoCamera::open()
        }
    }
}

/// A running scene.
struct Scene {
    config: SceneConfig,

    /// The latest hand sample, written by the signal source.
    hand: HandCell,

    animator: Animator,
    camera: CameraController,

    /// The background signal source. Dropping this stops it and releases the camera.
    vision: SignalSourceHandle,

    started: Instant,
}

impl Scene {
    /// Generate the scene and start the signal source.
    #[instrument(skip_all)]
    fn start(config: SceneConfig) -> Result<Self, ConfigError> {
        let hand = HandCell::new();
        let vision = ct_vision::launch(
            std::env::var("API_KEY").ok(),
            &hand,
            GeminiClassifier::new,
            open_camera,
        )?;

        let populations = Populations::generate(&config, &mut scene_rng());
        let animator = Animator::new(&populations, &config.motion);
        let camera = CameraController::new(config.camera);

        info!("Started scene");
        Ok(Self {
            config,
            hand,
            animator,
            camera,
            vision,
            started: Instant::now(),
        })
    }

    /// Step the animation and draw one frame.
    fn update(&mut self, ctx: &egui::Context) {
        let sample = self.hand.latest();
        let elapsed = self.started.elapsed().as_secs_f32();

        self.animator.tick(&sample, elapsed);
        self.camera.update(&sample);

        let background = color(self.config.palette.emerald_deep).gamma_multiply(0.15);
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(background))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter_at(rect);

                SceneView {
                    animator: &self.animator,
                    camera: &self.camera,
                    config: &self.config,
                    elapsed,
                }
                .paint(&painter, rect);

                self.overlay(&painter, rect, sample.state.is_chaos(), elapsed);
            });
    }

    /// Draw the title, the status, and the hints over the scene.
    fn overlay(&self, painter: &egui::Painter, rect: egui::Rect, chaos: bool, elapsed: f32) {
        let palette = &self.config.palette;
        let status = self.vision.status();

        painter.text(
            rect.center_top() + egui::vec2(0., 40.),
            Align2::CENTER_CENTER,
            "THE GRAND TREE",
            FontId::proportional(48.),
            color(palette.gold_high),
        );
        painter.text(
            rect.center_top() + egui::vec2(0., 80.),
            Align2::CENTER_CENTER,
            "LUXURY • INTERACTIVE • GOLD",
            FontId::proportional(14.),
            Color32::from_rgb(0xa7, 0xf3, 0xd0),
        );

        if !status.is_video_ready() {
            // Pulse like a loading indicator
            let alpha = 0.6 + 0.4 * (elapsed * 3.).sin();
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Initializing Camera & AI...",
                FontId::proportional(20.),
                Color32::from_rgb(0xfe, 0xf0, 0x8a).gamma_multiply(alpha),
            );
        } else if chaos {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "UNLEASHED",
                FontId::proportional(96.),
                Color32::from_rgb(0xef, 0x44, 0x44),
            );
        }

        painter.text(
            rect.center_bottom() - egui::vec2(0., 30.),
            Align2::CENTER_CENTER,
            "FIST: FORM TREE    OPEN HAND: UNLEASH CHAOS    MOVE: PAN",
            FontId::proportional(12.),
            color(palette.gold_high),
        );

        painter.text(
            rect.left_bottom() + egui::vec2(16., -16.),
            Align2::LEFT_BOTTOM,
            if status.is_thinking() {
                "SYSTEM: THINKING..."
            } else {
                "SYSTEM: READY"
            },
            FontId::monospace(10.),
            color(palette.gold_high),
        );
    }
}

/// The app type itself.
pub struct App {
    state: Result<Scene, ConfigError>,
}

impl App {
    /// Create a new [`App`] and start the scene, unless the config is bad.
    pub fn new(_cc: &eframe::CreationContext, config: Result<SceneConfig, ConfigError>) -> Self {
        let state = config.and_then(Scene::start);
        if let Err(error) = &state {
            error!(%error, "Unable to start scene");
        }

        Self { state }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match &mut self.state {
            Ok(scene) => {
                scene.update(ctx);

                // We need to constantly be repainting so that the animation runs every frame
                ctx.request_repaint();
            }
            Err(error) => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none().fill(Color32::BLACK))
                    .show(ctx, |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.label(
                                RichText::new(error.to_string())
                                    .color(Color32::from_rgb(0xef, 0x44, 0x44))
                                    .size(24.),
                            );
                        });
                    });
            }
        }
    }
}
