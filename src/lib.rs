// Library interface for chicane
// This allows integration tests to access internal modules

pub mod errors;
pub mod geometry;
pub mod render;
pub mod replay;
pub mod ui;

// Re-export commonly used types
pub use errors::ChicaneError;
pub use geometry::{BoundingBox, Point2, ReferenceLap, TrackOutline};
pub use geometry::viewport::{ScreenOutline, ViewportTransform};
pub use render::{DrawCmd, Scene};
pub use replay::{DriverPosition, Frame, ReplayController, ReplaySession};
