// Track geometry: boundary offsetting from a reference lap and polyline resampling.
// Everything in this module works in world coordinates; screen mapping lives in
// the viewport submodule.

pub mod viewport;

use log::debug;

/// Number of points each boundary polyline is resampled to for rendering.
pub const RESAMPLED_POINTS: usize = 2000;
/// Default track width in world units when the caller does not supply one.
/// Each boundary is offset by half this value, so the default puts inner and
/// outer edges 50 world units from the centerline.
pub const DEFAULT_TRACK_WIDTH: f32 = 100.0;

/// A 2D point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box over a set of world points.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self {
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    pub fn update(&mut self, point: Point2) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, point: Point2) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

/// One lap's centerline trace, the basis for the track outline. Immutable
/// after load.
#[derive(Debug, Clone)]
pub struct ReferenceLap {
    pub points: Vec<Point2>,
}

/// Inner and outer track boundary derived from a reference lap, resampled to
/// [`RESAMPLED_POINTS`] points each, plus the bounding box over the centerline
/// and both boundaries.
#[derive(Debug, Clone)]
pub struct TrackOutline {
    pub inner: Vec<Point2>,
    pub outer: Vec<Point2>,
    pub bounds: BoundingBox,
}

impl TrackOutline {
    pub fn from_reference_lap(lap: &ReferenceLap, track_width: f32) -> Self {
        let (inner, outer, bounds) = offset_boundaries(&lap.points, track_width);
        Self {
            inner: resample(&inner, RESAMPLED_POINTS),
            outer: resample(&outer, RESAMPLED_POINTS),
            bounds,
        }
    }
}

/// Discrete derivative of a sample sequence: central differences in the
/// interior, one-sided differences at the endpoints.
fn gradient(values: &[f32]) -> Vec<f32> {
    let n = values.len();
    debug_assert!(n >= 2, "gradient needs at least two samples");
    (0..n)
        .map(|i| {
            if i == 0 {
                values[1] - values[0]
            } else if i == n - 1 {
                values[n - 1] - values[n - 2]
            } else {
                (values[i + 1] - values[i - 1]) / 2.0
            }
        })
        .collect()
}

/// Offset the centerline by half the track width along the local normal on
/// each side. Returns (inner, outer, bounds) where the point counts match the
/// centerline sample count and the bounding box covers the centerline and
/// both boundaries.
///
/// Zero-length tangents (duplicate samples) get a fallback norm of 1.0 so the
/// boundary point collapses onto the centerline instead of dividing by zero.
pub fn offset_boundaries(
    centerline: &[Point2],
    track_width: f32,
) -> (Vec<Point2>, Vec<Point2>, BoundingBox) {
    let xs: Vec<f32> = centerline.iter().map(|p| p.x).collect();
    let ys: Vec<f32> = centerline.iter().map(|p| p.y).collect();

    let dx = gradient(&xs);
    let dy = gradient(&ys);

    let half_width = track_width / 2.0;
    let mut inner = Vec::with_capacity(centerline.len());
    let mut outer = Vec::with_capacity(centerline.len());
    let mut bounds = BoundingBox::new();
    let mut degenerate_tangents = 0usize;

    for (i, point) in centerline.iter().enumerate() {
        let mut norm = (dx[i] * dx[i] + dy[i] * dy[i]).sqrt();
        if norm == 0.0 {
            degenerate_tangents += 1;
            norm = 1.0;
        }
        // outward normal is the unit tangent rotated 90 degrees
        let nx = -dy[i] / norm;
        let ny = dx[i] / norm;

        let outer_point = Point2::new(point.x + nx * half_width, point.y + ny * half_width);
        let inner_point = Point2::new(point.x - nx * half_width, point.y - ny * half_width);

        bounds.update(*point);
        bounds.update(inner_point);
        bounds.update(outer_point);

        outer.push(outer_point);
        inner.push(inner_point);
    }

    if degenerate_tangents > 0 {
        debug!(
            "Substituted unit fallback for {} zero-length tangents in {} centerline samples",
            degenerate_tangents,
            centerline.len()
        );
    }

    (inner, outer, bounds)
}

/// Resample a polyline to `target` points by linearly interpolating the x and
/// y sequences over an index-uniform parameter in [0, 1].
///
/// Parameterization is by sample index, not arc length: sparse or unevenly
/// spaced input over- or under-weights some segments relative to the true
/// geometry.
pub fn resample(points: &[Point2], target: usize) -> Vec<Point2> {
    if points.len() < 2 || target < 2 {
        return points.to_vec();
    }
    let n = points.len();
    let mut resampled = Vec::with_capacity(target);
    for j in 0..target {
        let t = j as f32 / (target - 1) as f32;
        let pos = t * (n - 1) as f32;
        let i = (pos.floor() as usize).min(n - 2);
        let frac = pos - i as f32;
        resampled.push(Point2::new(
            points[i].x + frac * (points[i + 1].x - points[i].x),
            points[i].y + frac * (points[i + 1].y - points[i].y),
        ));
    }
    resampled
}
