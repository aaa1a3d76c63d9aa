use egui::Pos2;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::ChicaneError;

const CONFIG_FILE_NAME: &str = "config.json";

/// Default window size used before the user has resized anything. These are
/// starting sizes, not limits.
pub const DEFAULT_WINDOW_WIDTH: f32 = 1920.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 1200.0;
/// How many frames a single seek key press moves the replay.
pub const DEFAULT_SEEK_STEP_FRAMES: i64 = 10;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WindowPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self { x: 0., y: 0. }
    }
}

impl From<WindowPosition> for Pos2 {
    fn from(value: WindowPosition) -> Self {
        Pos2::new(value.x, value.y)
    }
}

impl From<Pos2> for WindowPosition {
    fn from(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub window_position: WindowPosition,
    pub seek_step_frames: i64,
    pub default_playback_speed: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            window_position: WindowPosition::default(),
            seek_step_frames: DEFAULT_SEEK_STEP_FRAMES,
            default_playback_speed: 1.0,
        }
    }
}

impl AppConfig {
    pub fn from_local_file() -> Option<Self> {
        let config_path = dirs::config_dir()?.join("chicane").join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            match serde_json::from_reader(file) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Could not parse config file, using defaults: {}", e);
                    None
                }
            }
        } else {
            None
        }
    }

    pub fn save(&self) -> Result<(), ChicaneError> {
        let config_path = dirs::config_dir()
            .ok_or(ChicaneError::NoConfigDir)?
            .join("chicane")
            .join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ChicaneError::ConfigIOError { source: e })?;
            }
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| ChicaneError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self)
            .map_err(|e| ChicaneError::ConfigSerializeError { source: e })
    }
}
