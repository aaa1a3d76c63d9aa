// World-to-screen mapping: fits the track bounding box into the current
// window with padding, preserving aspect ratio and centering the track.

use egui::Pos2;

use super::{BoundingBox, Point2, TrackOutline};

/// Fractional padding kept on each side of the window.
pub const VIEWPORT_PADDING: f32 = 0.05;
/// Floor applied to world extents to avoid a degenerate scale.
pub const MIN_WORLD_EXTENT: f32 = 1.0;

/// Uniform scale plus translation mapping world coordinates to screen
/// coordinates: `screen = world * scale + translation`. Rebuilt whole on
/// every resize, never updated incrementally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub tx: f32,
    pub ty: f32,
}

impl ViewportTransform {
    /// Compute the transform that fits `bounds` into a window of the given
    /// pixel dimensions. The limiting dimension determines the scale and the
    /// bounding box center maps to the window center.
    pub fn fit(window_width: f32, window_height: f32, bounds: &BoundingBox) -> Self {
        let world_w = bounds.width().max(MIN_WORLD_EXTENT);
        let world_h = bounds.height().max(MIN_WORLD_EXTENT);

        let usable_w = window_width * (1.0 - 2.0 * VIEWPORT_PADDING);
        let usable_h = window_height * (1.0 - 2.0 * VIEWPORT_PADDING);

        let scale = (usable_w / world_w).min(usable_h / world_h);

        let world_center = bounds.center();
        let tx = window_width / 2.0 - scale * world_center.x;
        let ty = window_height / 2.0 - scale * world_center.y;

        Self { scale, tx, ty }
    }

    pub fn apply(&self, point: Point2) -> Pos2 {
        Pos2::new(self.scale * point.x + self.tx, self.scale * point.y + self.ty)
    }
}

/// Screen-space boundary polylines, memoized on the transform that produced
/// them. `project` is a no-op while the transform is unchanged and recomputes
/// both polylines the moment it differs, so stale points are never exposed.
#[derive(Debug, Default)]
pub struct ScreenOutline {
    projected_for: Option<ViewportTransform>,
    inner: Vec<Pos2>,
    outer: Vec<Pos2>,
}

impl ScreenOutline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&mut self, outline: &TrackOutline, transform: ViewportTransform) {
        if self.projected_for == Some(transform) {
            return;
        }
        self.inner = outline.inner.iter().map(|p| transform.apply(*p)).collect();
        self.outer = outline.outer.iter().map(|p| transform.apply(*p)).collect();
        self.projected_for = Some(transform);
    }

    pub fn inner(&self) -> &[Pos2] {
        &self.inner
    }

    pub fn outer(&self) -> &[Pos2] {
        &self.outer
    }
}
