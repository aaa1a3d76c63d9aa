// Presenter: a deterministic read-and-draw pass over the current replay
// state. Produces an ordered list of draw commands; executing them against a
// real painter is the UI shell's job, which keeps this whole pass testable
// without a window.

use egui::{Align2, Color32, Pos2, Vec2};

use crate::geometry::Point2;
use crate::geometry::viewport::{ScreenOutline, ViewportTransform};
use crate::replay::{ReplayController, ReplaySession, format_race_clock};

pub const TRACK_COLOR: Color32 = Color32::from_rgb(150, 150, 150);
pub const TRACK_STROKE_WIDTH: f32 = 4.0;
pub const CAR_MARKER_RADIUS: f32 = 6.0;

const HUD_MARGIN: f32 = 20.0;
const LEADERBOARD_ROW_HEIGHT: f32 = 25.0;
const LEGEND_BLOCK_HEIGHT: f32 = 150.0;
const LEGEND_LINE_HEIGHT: f32 = 25.0;

const LEGEND_LINES: [&str; 4] = [
    "Controls:",
    "[SPACE]  Pause/Resume",
    "[\u{2190}/\u{2192}]    Rewind / FastForward",
    "[\u{2191}/\u{2193}]    Speed +/- (0.5x, 1x, 2x, 4x)",
];

/// A single drawing primitive in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Background texture stretched over the whole window. Skipped by the
    /// executor when no texture is available.
    Background,
    LineStrip {
        points: Vec<Pos2>,
        color: Color32,
        width: f32,
    },
    Marker {
        center: Pos2,
        radius: f32,
        color: Color32,
    },
    Text {
        pos: Pos2,
        anchor: Align2,
        text: String,
        size: f32,
        color: Color32,
        bold: bool,
    },
}

/// Ordered draw commands for one rendered frame.
#[derive(Debug, Default)]
pub struct Scene {
    pub commands: Vec<DrawCmd>,
}

impl Scene {
    pub fn markers(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Marker { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Compose one frame of the replay: background, track boundaries, car
/// markers, and the HUD. `screen_outline` memoizes the projected boundary
/// polylines; it is reprojected here whenever the fitted transform changes.
pub fn render(
    session: &ReplaySession,
    controller: &ReplayController,
    screen_outline: &mut ScreenOutline,
    window: Vec2,
) -> Scene {
    let transform = ViewportTransform::fit(window.x, window.y, &session.outline.bounds);
    screen_outline.project(&session.outline, transform);

    let mut scene = Scene::default();
    scene.commands.push(DrawCmd::Background);

    for boundary in [screen_outline.inner(), screen_outline.outer()] {
        if boundary.len() > 1 {
            scene.commands.push(DrawCmd::LineStrip {
                points: boundary.to_vec(),
                color: TRACK_COLOR,
                width: TRACK_STROKE_WIDTH,
            });
        }
    }

    // a controller built for a longer frame sequence must not index past
    // this session's frames
    let frame = &session.frames[controller.frame_index().min(session.frames.len() - 1)];

    for (code, pos) in &frame.drivers {
        if pos.is_out() {
            continue;
        }
        scene.commands.push(DrawCmd::Marker {
            center: transform.apply(Point2::new(pos.x, pos.y)),
            radius: CAR_MARKER_RADIUS,
            color: session.driver_color(code),
        });
    }

    // HUD top-left: leader's lap counter and the race clock
    let leader_lap = frame.leader().map(|(_, pos)| pos.lap).unwrap_or(1);
    scene.commands.push(DrawCmd::Text {
        pos: Pos2::new(HUD_MARGIN, 40.0),
        anchor: Align2::LEFT_TOP,
        text: format!("Lap: {}", leader_lap),
        size: 24.0,
        color: Color32::WHITE,
        bold: false,
    });
    scene.commands.push(DrawCmd::Text {
        pos: Pos2::new(HUD_MARGIN, 80.0),
        anchor: Align2::LEFT_TOP,
        text: format!("Race Time: {}", format_race_clock(frame.t)),
        size: 20.0,
        color: Color32::WHITE,
        bold: false,
    });

    // leaderboard top-right, sorted by descending distance
    let leaderboard_x = window.x - HUD_MARGIN;
    let leaderboard_y = 40.0;
    scene.commands.push(DrawCmd::Text {
        pos: Pos2::new(leaderboard_x, leaderboard_y),
        anchor: Align2::RIGHT_TOP,
        text: "Leaderboard".to_string(),
        size: 20.0,
        color: Color32::WHITE,
        bold: true,
    });
    for (i, (code, pos)) in frame.standings().iter().enumerate() {
        let text = if pos.is_out() {
            format!("{}. {}   OUT", i + 1, code)
        } else {
            format!("{}. {}", i + 1, code)
        };
        scene.commands.push(DrawCmd::Text {
            pos: Pos2::new(
                leaderboard_x,
                leaderboard_y + 30.0 + i as f32 * LEADERBOARD_ROW_HEIGHT,
            ),
            anchor: Align2::RIGHT_TOP,
            text,
            size: 16.0,
            color: session.driver_color(code),
            bold: false,
        });
    }

    // static control legend bottom-left
    for (i, line) in LEGEND_LINES.iter().enumerate() {
        scene.commands.push(DrawCmd::Text {
            pos: Pos2::new(
                HUD_MARGIN,
                window.y - LEGEND_BLOCK_HEIGHT + i as f32 * LEGEND_LINE_HEIGHT,
            ),
            anchor: Align2::LEFT_TOP,
            text: (*line).to_string(),
            size: 14.0,
            color: if i == 0 {
                Color32::WHITE
            } else {
                Color32::LIGHT_GRAY
            },
            bold: i == 0,
        });
    }

    scene
}
