// Replay session state: frame data, driver positions, and the transport
// controller that owns frame index, playback speed, and pause state.

pub mod loader;

use std::collections::HashMap;

use egui::Color32;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::ChicaneError;
use crate::geometry::{ReferenceLap, TrackOutline};

/// Playback speed never drops below this, so halving can never reach zero or
/// go negative.
pub const MIN_PLAYBACK_SPEED: f32 = 0.1;
/// Fixed speed presets bound to the number keys.
pub const SPEED_PRESETS: [f32; 4] = [0.5, 1.0, 2.0, 4.0];
/// Marker color for drivers without an assigned color.
pub const DEFAULT_DRIVER_COLOR: Color32 = Color32::WHITE;

fn default_lap() -> u32 {
    1
}

/// One driver's state within a frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DriverPosition {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_lap")]
    pub lap: u32,
    #[serde(default)]
    pub dist: f32,
    /// `1.0` signals the driver has exited the session.
    #[serde(default)]
    pub rel_dist: f32,
}

impl DriverPosition {
    pub fn is_out(&self) -> bool {
        self.rel_dist == 1.0
    }
}

/// A single replay frame: race clock timestamp plus every driver's position.
/// Frames are read-only once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// Race time in seconds.
    pub t: f64,
    pub drivers: HashMap<String, DriverPosition>,
}

impl Frame {
    /// The driver leading the race: lexicographic maximum of (lap, dist).
    pub fn leader(&self) -> Option<(&str, &DriverPosition)> {
        self.drivers
            .iter()
            .max_by(|a, b| {
                (a.1.lap, a.1.dist)
                    .partial_cmp(&(b.1.lap, b.1.dist))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(code, pos)| (code.as_str(), pos))
    }

    /// Drivers sorted by descending distance. Exited drivers keep their
    /// last-known rank.
    pub fn standings(&self) -> Vec<(&str, &DriverPosition)> {
        self.drivers
            .iter()
            .sorted_by(|a, b| {
                b.1.dist
                    .partial_cmp(&a.1.dist)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(code, pos)| (code.as_str(), pos))
            .collect()
    }
}

/// Format a raw seconds timestamp as a H:MM:SS race clock.
pub fn format_race_clock(t: f64) -> String {
    let total = t.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Everything one replay session owns for its lifetime: the frame sequence,
/// the participants, their colors, and the track outline derived from the
/// reference lap. Passed explicitly to every component.
pub struct ReplaySession {
    pub frames: Vec<Frame>,
    pub drivers: Vec<String>,
    pub colors: HashMap<String, Color32>,
    pub outline: TrackOutline,
}

impl ReplaySession {
    pub fn new(
        frames: Vec<Frame>,
        reference_lap: &ReferenceLap,
        track_width: f32,
        colors: HashMap<String, Color32>,
    ) -> Result<Self, ChicaneError> {
        if frames.is_empty() {
            return Err(ChicaneError::EmptyReplay);
        }
        let drivers = frames
            .iter()
            .flat_map(|f| f.drivers.keys())
            .unique()
            .sorted()
            .cloned()
            .collect();
        let outline = TrackOutline::from_reference_lap(reference_lap, track_width);
        Ok(Self {
            frames,
            drivers,
            colors,
            outline,
        })
    }

    /// A transport controller sized to this session's frame sequence, so the
    /// frame index stays in range of the frames it indexes.
    pub fn controller(&self, playback_speed: f32) -> ReplayController {
        ReplayController::new(self.frames.len(), playback_speed)
    }

    pub fn driver_color(&self, code: &str) -> Color32 {
        self.colors
            .get(code)
            .copied()
            .unwrap_or(DEFAULT_DRIVER_COLOR)
    }
}

/// Transport state for a replay: current frame index, playback speed, paused
/// flag. Reaching the last frame clamps the index; playback never wraps and
/// the session never terminates on its own.
#[derive(Debug, Clone)]
pub struct ReplayController {
    frame_index: usize,
    frame_count: usize,
    playback_speed: f32,
    paused: bool,
}

impl ReplayController {
    pub fn new(frame_count: usize, playback_speed: f32) -> Self {
        Self {
            frame_index: 0,
            frame_count,
            playback_speed: playback_speed.max(MIN_PLAYBACK_SPEED),
            paused: false,
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advance one simulation tick. While playing, the index moves by
    /// `max(1, round(speed))` frames and clamps at the last valid frame.
    pub fn advance(&mut self) {
        if self.paused || self.frame_count == 0 {
            return;
        }
        let step = (self.playback_speed.round() as usize).max(1);
        self.frame_index = (self.frame_index + step).min(self.frame_count - 1);
    }

    /// Move the index by a signed frame offset, clamped into the valid range.
    /// Usable while paused or playing.
    pub fn seek(&mut self, delta: i64) {
        if self.frame_count == 0 {
            return;
        }
        let target = self.frame_index as i64 + delta;
        self.frame_index = target.clamp(0, self.frame_count as i64 - 1) as usize;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.playback_speed = speed.max(MIN_PLAYBACK_SPEED);
    }

    pub fn double_speed(&mut self) {
        self.set_speed(self.playback_speed * 2.0);
    }

    pub fn halve_speed(&mut self) {
        self.set_speed(self.playback_speed / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frame_with(drivers: Vec<(&str, u32, f32, f32)>) -> Frame {
        Frame {
            t: 0.0,
            drivers: drivers
                .into_iter()
                .map(|(code, lap, dist, rel_dist)| {
                    (
                        code.to_string(),
                        DriverPosition {
                            x: 0.0,
                            y: 0.0,
                            lap,
                            dist,
                            rel_dist,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_advance_at_speed_one_increments_by_one() {
        let mut controller = ReplayController::new(100, 1.0);
        controller.advance();
        assert_eq!(controller.frame_index(), 1);
    }

    #[test]
    fn test_advance_clamps_at_last_frame() {
        // frame_count=100, index=95, speed=1: after 10 advances the index
        // clamps at 99
        let mut controller = ReplayController::new(100, 1.0);
        controller.seek(95);
        for _ in 0..10 {
            controller.advance();
        }
        assert_eq!(controller.frame_index(), 99);
    }

    #[test]
    fn test_advance_on_last_frame_is_a_noop() {
        let mut controller = ReplayController::new(10, 4.0);
        controller.seek(9);
        controller.advance();
        assert_eq!(controller.frame_index(), 9);
    }

    #[test]
    fn test_advance_while_paused_does_nothing() {
        let mut controller = ReplayController::new(100, 1.0);
        controller.toggle_pause();
        controller.advance();
        assert_eq!(controller.frame_index(), 0);
        controller.toggle_pause();
        controller.advance();
        assert_eq!(controller.frame_index(), 1);
    }

    #[test]
    fn test_fractional_speed_still_steps_one_frame() {
        let mut controller = ReplayController::new(100, 0.5);
        controller.advance();
        assert_eq!(controller.frame_index(), 1);
    }

    #[test]
    fn test_seek_clamps_both_ends() {
        let mut controller = ReplayController::new(50, 1.0);
        controller.seek(-10);
        assert_eq!(controller.frame_index(), 0);
        controller.seek(1000);
        assert_eq!(controller.frame_index(), 49);
        controller.seek(-10);
        assert_eq!(controller.frame_index(), 39);
    }

    #[test]
    fn test_speed_floor() {
        let mut controller = ReplayController::new(10, 1.0);
        for _ in 0..10 {
            controller.halve_speed();
        }
        assert_eq!(controller.playback_speed(), MIN_PLAYBACK_SPEED);
        controller.set_speed(-4.0);
        assert_eq!(controller.playback_speed(), MIN_PLAYBACK_SPEED);
    }

    #[test]
    fn test_speed_presets() {
        let mut controller = ReplayController::new(10, 1.0);
        for preset in SPEED_PRESETS {
            controller.set_speed(preset);
            assert_eq!(controller.playback_speed(), preset);
        }
    }

    #[test]
    fn test_leader_is_lexicographic_on_lap_then_dist() {
        let frame = frame_with(vec![
            ("VER", 3, 120.0, 0.0),
            ("HAM", 4, 10.0, 0.0),
            ("LEC", 3, 900.0, 0.0),
        ]);
        assert_eq!(frame.leader().unwrap().0, "HAM");
    }

    #[test]
    fn test_standings_sorted_by_descending_distance() {
        let frame = frame_with(vec![
            ("VER", 1, 120.0, 0.0),
            ("HAM", 1, 450.0, 0.0),
            ("LEC", 1, 300.0, 1.0),
        ]);
        let standings = frame.standings();
        let order: Vec<&str> = standings.iter().map(|(code, _)| *code).collect();
        assert_eq!(order, vec!["HAM", "LEC", "VER"]);
        // exited driver keeps its distance-sorted rank
        assert!(standings[1].1.is_out());
    }

    #[test]
    fn test_format_race_clock() {
        assert_eq!(format_race_clock(0.0), "00:00:00");
        assert_eq!(format_race_clock(59.9), "00:00:59");
        assert_eq!(format_race_clock(3661.0), "01:01:01");
        assert_eq!(format_race_clock(7325.4), "02:02:05");
        assert_eq!(format_race_clock(-5.0), "00:00:00");
    }

    #[test]
    fn test_session_rejects_empty_frames() {
        let lap = ReferenceLap {
            points: vec![
                crate::geometry::Point2::new(0.0, 0.0),
                crate::geometry::Point2::new(1.0, 0.0),
            ],
        };
        let result = ReplaySession::new(Vec::new(), &lap, 100.0, HashMap::new());
        assert!(matches!(result, Err(ChicaneError::EmptyReplay)));
    }

    #[test]
    fn test_session_controller_sized_to_frames() {
        let lap = ReferenceLap {
            points: (0..10)
                .map(|i| crate::geometry::Point2::new(i as f32, 0.0))
                .collect(),
        };
        let frames = vec![frame_with(vec![("VER", 1, 0.0, 0.0)]); 3];
        let session = ReplaySession::new(frames, &lap, 100.0, HashMap::new()).unwrap();

        let mut controller = session.controller(4.0);
        assert_eq!(controller.playback_speed(), 4.0);
        controller.seek(100);
        assert_eq!(controller.frame_index(), session.frames.len() - 1);
    }

    #[test]
    fn test_session_collects_drivers_across_frames() {
        let lap = ReferenceLap {
            points: (0..10)
                .map(|i| crate::geometry::Point2::new(i as f32, (i * i) as f32))
                .collect(),
        };
        let frames = vec![
            frame_with(vec![("VER", 1, 0.0, 0.0)]),
            frame_with(vec![("HAM", 1, 0.0, 0.0), ("VER", 1, 5.0, 0.0)]),
        ];
        let session = ReplaySession::new(frames, &lap, 100.0, HashMap::new()).unwrap();
        assert_eq!(session.drivers, vec!["HAM", "VER"]);
        assert_eq!(session.driver_color("VER"), DEFAULT_DRIVER_COLOR);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_index_always_in_range(
            frame_count in 1usize..500,
            speed in 0.0f32..64.0f32,
            seeks in proptest::collection::vec(-200i64..200, 0..20),
        ) {
            let mut controller = ReplayController::new(frame_count, speed);
            for delta in seeks {
                controller.seek(delta);
                controller.advance();
                prop_assert!(controller.frame_index() < frame_count);
            }
        }

        #[test]
        fn prop_speed_never_below_minimum(
            initial in 0.0f32..16.0f32,
            halvings in 0usize..30,
        ) {
            let mut controller = ReplayController::new(10, initial);
            for _ in 0..halvings {
                controller.halve_speed();
            }
            prop_assert!(controller.playback_speed() >= MIN_PLAYBACK_SPEED);
        }
    }
}
