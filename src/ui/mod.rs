pub mod config;
pub mod replay_view;

use egui::Color32;

pub use replay_view::ReplayApp;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);

/// Relative path checked for the optional background texture. Absence just
/// means no background is drawn.
pub const BACKGROUND_PATH: &str = "resources/background.png";
