//! Point and bounding-box primitives

use serde::{Deserialize, Serialize};

/// Point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box given by its min/max corners
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Degenerate (zero-area) box at a single point
    pub fn from_point(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Box from a top-left corner and a size. Negative sizes are normalized.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x.min(x + width),
            min_y: y.min(y + height),
            max_x: x.max(x + width),
            max_y: y.max(y + height),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |acc, p| Self {
            min_x: acc.min_x.min(p.x),
            min_y: acc.min_y.min(p.y),
            max_x: acc.max_x.max(p.x),
            max_y: acc.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Closed-interval overlap test: touching edges count as intersecting
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.intersects(&Bounds::from_point(p))
    }
}
