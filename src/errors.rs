// Error types for chicane

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum ChicaneError {
    // Errors while loading replay input files
    #[snafu(display("Invalid replay file: {path}"))]
    InvalidReplayFile { path: String },
    #[snafu(display("Error reading replay frames file"))]
    FrameLoaderError { source: io::Error },
    #[snafu(display("Error parsing replay input file"))]
    ReplayParseError { source: serde_json::Error },
    #[snafu(display("Replay contains no frames"))]
    EmptyReplay,

    // Errors for the reference lap used to derive the track outline
    #[snafu(display(
        "Reference lap coordinate sequences have mismatched lengths: {x_len} x samples, {y_len} y samples"
    ))]
    ReferenceLapMismatch { x_len: usize, y_len: usize },
    #[snafu(display("Reference lap too short: {samples} samples, need at least 2"))]
    ReferenceLapTooShort { samples: usize },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}
