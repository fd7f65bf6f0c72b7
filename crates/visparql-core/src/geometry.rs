//! Boundary intersection for edge anchoring.
//!
//! Every node is drawn as an axis-aligned rounded rectangle centered on its
//! position. A corner radius of zero gives a plain rectangle; a radius of
//! half the side gives a circle, which stands in for an ellipse. Edges are
//! anchored where the segment between two node centers crosses the outline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EPSILON: f64 = 1e-9;

/// Tolerance for points lying on the outline.
const BOUNDARY_TOLERANCE: f64 = 1e-6;

/// A 2D point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn lerp(self, to: Point, t: f64) -> Point {
        Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

/// Outline of a node: a rounded rectangle centered on `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
}

impl Shape {
    /// A plain rectangle.
    pub fn rect(center: Point, width: f64, height: f64) -> Self {
        Self::rounded(center, width, height, 0.0)
    }

    /// A rounded rectangle. The radius is clamped to half the shorter side.
    pub fn rounded(center: Point, width: f64, height: f64, corner_radius: f64) -> Self {
        let max_radius = width.min(height) / 2.0;
        Self {
            center,
            width,
            height,
            corner_radius: corner_radius.clamp(0.0, max_radius.max(0.0)),
        }
    }

    /// A circle of the given diameter.
    pub fn circle(center: Point, diameter: f64) -> Self {
        Self::rounded(center, diameter, diameter, diameter / 2.0)
    }

    /// Returns the same outline moved to a new center.
    pub fn at(self, center: Point) -> Self {
        Self { center, ..self }
    }

    fn min_x(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    fn max_x(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    fn min_y(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    fn max_y(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    /// Centers of the four corner arcs: top-left, top-right, bottom-right, bottom-left.
    fn corner_centers(&self) -> [Point; 4] {
        let r = self.corner_radius;
        [
            Point::new(self.min_x() + r, self.min_y() + r),
            Point::new(self.max_x() - r, self.min_y() + r),
            Point::new(self.max_x() - r, self.max_y() - r),
            Point::new(self.min_x() + r, self.max_y() - r),
        ]
    }

    /// True if `p` lies inside the outline or on it.
    pub fn contains(&self, p: Point) -> bool {
        let dx = (p.x - self.center.x).abs();
        let dy = (p.y - self.center.y).abs();
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        if dx > hw + BOUNDARY_TOLERANCE || dy > hh + BOUNDARY_TOLERANCE {
            return false;
        }

        let r = self.corner_radius;
        let inner_x = hw - r;
        let inner_y = hh - r;
        if dx <= inner_x || dy <= inner_y {
            return true;
        }
        (dx - inner_x).hypot(dy - inner_y) <= r + BOUNDARY_TOLERANCE
    }

    /// Parameters `t` in `[0, 1]` where `from + t * (to - from)` meets the outline.
    fn crossings(&self, from: Point, to: Point) -> Vec<f64> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let r = self.corner_radius;
        let mut candidates = Vec::new();

        // Straight sides, excluding the parts replaced by corner arcs.
        if dy.abs() > EPSILON {
            for side_y in [self.min_y(), self.max_y()] {
                let t = (side_y - from.y) / dy;
                let x = from.x + t * dx;
                if x >= self.min_x() + r - BOUNDARY_TOLERANCE
                    && x <= self.max_x() - r + BOUNDARY_TOLERANCE
                {
                    candidates.push(t);
                }
            }
        }
        if dx.abs() > EPSILON {
            for side_x in [self.min_x(), self.max_x()] {
                let t = (side_x - from.x) / dx;
                let y = from.y + t * dy;
                if y >= self.min_y() + r - BOUNDARY_TOLERANCE
                    && y <= self.max_y() - r + BOUNDARY_TOLERANCE
                {
                    candidates.push(t);
                }
            }
        }

        // Corner arcs, restricted to the quadrant each arc covers.
        if r > EPSILON {
            let a = dx * dx + dy * dy;
            for corner in self.corner_centers() {
                let sx = from.x - corner.x;
                let sy = from.y - corner.y;
                let b = 2.0 * (sx * dx + sy * dy);
                let c = sx * sx + sy * sy - r * r;
                let discriminant = b * b - 4.0 * a * c;
                if discriminant < 0.0 {
                    continue;
                }
                let sqrt_disc = discriminant.sqrt();
                for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
                    let p = from.lerp(to, t);
                    let outward_x = (p.x - corner.x) * (corner.x - self.center.x);
                    let outward_y = (p.y - corner.y) * (corner.y - self.center.y);
                    if outward_x >= -BOUNDARY_TOLERANCE && outward_y >= -BOUNDARY_TOLERANCE {
                        candidates.push(t);
                    }
                }
            }
        }

        candidates.retain(|t| (-EPSILON..=1.0 + EPSILON).contains(t));
        candidates
    }
}

/// Geometry failures. Always recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The segment does not cross the outline yet.
    #[error("segment does not cross the shape outline")]
    NotFound,
}

/// Finds the first point where the segment `from -> to` crosses the outline of `target`.
///
/// Returns [`GeometryError::NotFound`] when both endpoints are inside the shape,
/// when the segment stops short of it, or when the segment has zero length.
/// Callers keep the edge endpoint unresolved and retry on the next pointer or
/// layout change.
pub fn boundary_intersection(
    from: Point,
    to: Point,
    target: &Shape,
) -> Result<Point, GeometryError> {
    if from.distance_to(to) <= EPSILON {
        return Err(GeometryError::NotFound);
    }
    if target.contains(from) && target.contains(to) {
        return Err(GeometryError::NotFound);
    }

    target
        .crossings(from, to)
        .into_iter()
        .map(|t| t.clamp(0.0, 1.0))
        .min_by(f64::total_cmp)
        .map(|t| from.lerp(to, t))
        .ok_or(GeometryError::NotFound)
}
