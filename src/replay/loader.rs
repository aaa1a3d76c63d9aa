use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use egui::Color32;
use log::{info, warn};
use serde::Deserialize;

use crate::errors::ChicaneError;
use crate::geometry::{Point2, ReferenceLap};
use crate::replay::Frame;

/// On-disk form of a reference lap: parallel coordinate arrays, one sample
/// per centerline point.
#[derive(Debug, Deserialize)]
struct ReferenceLapFile {
    x: Vec<f32>,
    y: Vec<f32>,
}

/// Load the ordered frame sequence from a JSONL file, one frame per line.
pub fn load_frames(path: &Path) -> Result<Vec<Frame>, ChicaneError> {
    if !path.exists() {
        return Err(ChicaneError::InvalidReplayFile {
            path: format!("{:?}", path),
        });
    }
    let frames = serde_jsonlines::json_lines(path)
        .map_err(|e| ChicaneError::FrameLoaderError { source: e })?
        .collect::<Result<Vec<Frame>, std::io::Error>>()
        .map_err(|e| ChicaneError::FrameLoaderError { source: e })?;
    if frames.is_empty() {
        return Err(ChicaneError::EmptyReplay);
    }

    let empty_frames = frames.iter().filter(|f| f.drivers.is_empty()).count();
    if empty_frames > 0 {
        warn!("{} of {} frames carry no driver data", empty_frames, frames.len());
    }
    info!("Loaded {} frames from {:?}", frames.len(), path);
    Ok(frames)
}

/// Load the reference lap used to derive the track outline.
pub fn load_reference_lap(path: &Path) -> Result<ReferenceLap, ChicaneError> {
    if !path.exists() {
        return Err(ChicaneError::InvalidReplayFile {
            path: format!("{:?}", path),
        });
    }
    let file = File::open(path).map_err(|e| ChicaneError::FrameLoaderError { source: e })?;
    let lap_file: ReferenceLapFile =
        serde_json::from_reader(file).map_err(|e| ChicaneError::ReplayParseError { source: e })?;

    if lap_file.x.len() != lap_file.y.len() {
        return Err(ChicaneError::ReferenceLapMismatch {
            x_len: lap_file.x.len(),
            y_len: lap_file.y.len(),
        });
    }
    if lap_file.x.len() < 2 {
        return Err(ChicaneError::ReferenceLapTooShort {
            samples: lap_file.x.len(),
        });
    }

    info!(
        "Loaded reference lap with {} samples from {:?}",
        lap_file.x.len(),
        path
    );
    Ok(ReferenceLap {
        points: lap_file
            .x
            .into_iter()
            .zip(lap_file.y)
            .map(|(x, y)| Point2::new(x, y))
            .collect(),
    })
}

/// Load the optional driver color map: JSON object of id to `[r, g, b]`.
pub fn load_driver_colors(path: &Path) -> Result<HashMap<String, Color32>, ChicaneError> {
    if !path.exists() {
        return Err(ChicaneError::InvalidReplayFile {
            path: format!("{:?}", path),
        });
    }
    let file = File::open(path).map_err(|e| ChicaneError::FrameLoaderError { source: e })?;
    let raw: HashMap<String, [u8; 3]> =
        serde_json::from_reader(file).map_err(|e| ChicaneError::ReplayParseError { source: e })?;
    Ok(raw
        .into_iter()
        .map(|(code, [r, g, b])| (code, Color32::from_rgb(r, g, b)))
        .collect())
}
