//! Canvas geometry
//!
//! Pure functions over 3D canvas coordinates: planar proximity, zoom
//! scaling, and the layout-priority ordering used for paint order and
//! hit-testing precedence.

use std::cmp::Ordering;

/// A position in canvas space
///
/// `z` is an inverse depth/zoom factor: smaller z means closer to the
/// viewer and larger on screen. Equality is exact component-wise float
/// equality — coordinates are pixel-snapped by the producing layer, so no
/// epsilon is applied. See `layout_cmp` for the ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Decode from a `[x, y, z]` wire triple
    pub fn from_components(values: &[f64]) -> Option<Self> {
        match values {
            [x, y, z, ..] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    /// True iff the squared planar (x, y) distance to `other` is within
    /// `radius` — z is ignored; this is a proximity test, not a depth test.
    ///
    /// Symmetric, and true whenever the planar components are equal and
    /// `radius >= 0`.
    pub fn is_intersecting_2d(&self, other: Location3D, radius: f64) -> bool {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx) + (dy * dy) <= radius * radius
    }

    /// Layout-priority ordering: z ascending, then y descending, then x
    /// descending. Fully equal triples compare `Equal`, so a stable sort
    /// keeps their input order.
    pub fn layout_cmp(&self, other: &Location3D) -> Ordering {
        match compare_f64(self.z, other.z) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match compare_f64(other.y, self.y) {
            Ordering::Equal => {}
            ord => return ord,
        }
        compare_f64(other.x, self.x)
    }
}

/// Scale a base radius by an inverse-depth factor
///
/// Radii shrink as content sits deeper (larger z).
pub fn scaled_radius(base_radius: f64, z: f64) -> f64 {
    base_radius / z
}

// Coordinates come from pixel-snapped UI layers; NaN never occurs in
// practice, and mapping it to Equal keeps the comparator total.
fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
