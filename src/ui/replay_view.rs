use std::path::Path;

use egui::{Color32, FontId, Frame, Key, Shape, Stroke, Vec2, Visuals, style::Widgets};
use log::{error, info};

use crate::geometry::viewport::ScreenOutline;
use crate::render::{DrawCmd, Scene, render};
use crate::replay::{ReplayController, ReplaySession, SPEED_PRESETS};

use super::config::AppConfig;
use super::{BACKGROUND_PATH, PALETTE_BLACK};

/// `ReplayApp` drives a replay session inside an eframe window: it forwards
/// key events to the transport controller, advances playback once per
/// repaint, and executes the scene produced by the presenter.
pub struct ReplayApp {
    session: ReplaySession,
    controller: ReplayController,
    screen_outline: ScreenOutline,
    app_config: AppConfig,
    has_background: bool,
}

impl ReplayApp {
    pub fn new(
        session: ReplaySession,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        // This gives us image support for the optional background texture:
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let default_visuals = Visuals {
            dark_mode: true,
            panel_fill: PALETTE_BLACK,
            widgets: Widgets::dark(),
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        let controller = session.controller(app_config.default_playback_speed);

        let has_background = Path::new(BACKGROUND_PATH).exists();
        if !has_background {
            info!("No background texture at {}, drawing without one", BACKGROUND_PATH);
        }

        Self {
            session,
            controller,
            screen_outline: ScreenOutline::new(),
            app_config,
            has_background,
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let seek_step = self.app_config.seek_step_frames;
        ctx.input(|i| {
            if i.key_pressed(Key::Space) {
                self.controller.toggle_pause();
            }
            if i.key_pressed(Key::ArrowRight) {
                self.controller.seek(seek_step);
            }
            if i.key_pressed(Key::ArrowLeft) {
                self.controller.seek(-seek_step);
            }
            if i.key_pressed(Key::ArrowUp) {
                self.controller.double_speed();
            }
            if i.key_pressed(Key::ArrowDown) {
                self.controller.halve_speed();
            }
            for (key, preset) in [Key::Num1, Key::Num2, Key::Num3, Key::Num4]
                .into_iter()
                .zip(SPEED_PRESETS)
            {
                if i.key_pressed(key) {
                    self.controller.set_speed(preset);
                }
            }
        });
    }

    fn paint_scene(&self, ui: &mut egui::Ui, scene: &Scene) {
        let rect = ui.max_rect();
        let painter = ui.painter();
        for cmd in &scene.commands {
            match cmd {
                DrawCmd::Background => {
                    if self.has_background {
                        egui::Image::from_uri(format!("file://{}", BACKGROUND_PATH))
                            .paint_at(ui, rect);
                    }
                }
                DrawCmd::LineStrip {
                    points,
                    color,
                    width,
                } => {
                    painter.add(Shape::line(points.clone(), Stroke::new(*width, *color)));
                }
                DrawCmd::Marker {
                    center,
                    radius,
                    color,
                } => {
                    painter.circle_filled(*center, *radius, *color);
                }
                DrawCmd::Text {
                    pos,
                    anchor,
                    text,
                    size,
                    color,
                    bold,
                } => {
                    painter.text(*pos, *anchor, text, FontId::proportional(*size), *color);
                    if *bold {
                        // egui's default font set carries no bold face
                        painter.text(
                            *pos + Vec2::new(0.5, 0.0),
                            *anchor,
                            text,
                            FontId::proportional(*size),
                            *color,
                        );
                    }
                }
            }
        }
    }
}

impl eframe::App for ReplayApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        if let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.app_config.window_position = outer_rect.min.into();
        }

        egui::CentralPanel::default()
            .frame(Frame::new().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.app_config.window_width = rect.width();
                self.app_config.window_height = rect.height();

                let scene = render(
                    &self.session,
                    &self.controller,
                    &mut self.screen_outline,
                    rect.size(),
                );
                self.paint_scene(ui, &scene);
            });

        // one simulation tick per render tick, same as the repaint cadence
        self.controller.advance();
        ctx.request_repaint();
    }
}
