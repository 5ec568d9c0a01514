//! Geometric targets of annotations

use super::types::{Bounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geometry type of a selector, used to look up editable-shape tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rect,
    Polygon,
    Point,
    Circle,
    Ellipse,
}

/// Shape of an annotation target in a single coordinate system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selector {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Polygon {
        points: Vec<Point>,
    },
    Point {
        x: f64,
        y: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
}

impl Selector {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Selector::Rect { .. } => ShapeKind::Rect,
            Selector::Polygon { .. } => ShapeKind::Polygon,
            Selector::Point { .. } => ShapeKind::Point,
            Selector::Circle { .. } => ShapeKind::Circle,
            Selector::Ellipse { .. } => ShapeKind::Ellipse,
        }
    }

    /// Axis-aligned bounding box of the shape
    pub fn bounds(&self) -> Bounds {
        match self {
            Selector::Rect {
                x,
                y,
                width,
                height,
            } => Bounds::from_rect(*x, *y, *width, *height),
            Selector::Polygon { points } => {
                Bounds::from_points(points.iter().copied()).unwrap_or_default()
            }
            Selector::Point { x, y } => Bounds::from_point(Point::new(*x, *y)),
            Selector::Circle { cx, cy, r } => {
                let r = r.abs();
                Bounds::from_rect(cx - r, cy - r, 2.0 * r, 2.0 * r)
            }
            Selector::Ellipse { cx, cy, rx, ry } => {
                let (rx, ry) = (rx.abs(), ry.abs());
                Bounds::from_rect(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry)
            }
        }
    }

    /// Exact geometric area of the shape (zero for points)
    pub fn area(&self) -> f64 {
        match self {
            Selector::Rect { width, height, .. } => (width * height).abs(),
            Selector::Polygon { points } => polygon_area(points),
            Selector::Point { .. } => 0.0,
            Selector::Circle { r, .. } => PI * r * r,
            Selector::Ellipse { rx, ry, .. } => (PI * rx * ry).abs(),
        }
    }

    /// Map the shape through a point transform.
    ///
    /// Radii are carried by projecting a point on the rim, so any similarity transform
    /// (uniform scale + translation, which is what a pan/zoom viewer applies) is exact.
    pub fn map_points<F>(&self, f: F) -> Selector
    where
        F: Fn(Point) -> Point,
    {
        match self {
            Selector::Rect {
                x,
                y,
                width,
                height,
            } => {
                let a = f(Point::new(*x, *y));
                let b = f(Point::new(x + width, y + height));
                Selector::Rect {
                    x: a.x.min(b.x),
                    y: a.y.min(b.y),
                    width: (b.x - a.x).abs(),
                    height: (b.y - a.y).abs(),
                }
            }
            Selector::Polygon { points } => Selector::Polygon {
                points: points.iter().map(|p| f(*p)).collect(),
            },
            Selector::Point { x, y } => {
                let p = f(Point::new(*x, *y));
                Selector::Point { x: p.x, y: p.y }
            }
            Selector::Circle { cx, cy, r } => {
                let c = f(Point::new(*cx, *cy));
                let rim = f(Point::new(cx + r, *cy));
                Selector::Circle {
                    cx: c.x,
                    cy: c.y,
                    r: c.distance(rim),
                }
            }
            Selector::Ellipse { cx, cy, rx, ry } => {
                let c = f(Point::new(*cx, *cy));
                let rim_x = f(Point::new(cx + rx, *cy));
                let rim_y = f(Point::new(*cx, cy + ry));
                Selector::Ellipse {
                    cx: c.x,
                    cy: c.y,
                    rx: c.distance(rim_x),
                    ry: c.distance(rim_y),
                }
            }
        }
    }

    /// Same shape moved by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> Selector {
        self.map_points(|p| Point::new(p.x + dx, p.y + dy))
    }

    /// Every coordinate, size and radius is finite
    pub fn is_finite(&self) -> bool {
        match self {
            Selector::Rect {
                x,
                y,
                width,
                height,
            } => [x, y, width, height].iter().all(|v| v.is_finite()),
            Selector::Polygon { points } => {
                points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
            }
            Selector::Point { x, y } => x.is_finite() && y.is_finite(),
            Selector::Circle { cx, cy, r } => [cx, cy, r].iter().all(|v| v.is_finite()),
            Selector::Ellipse { cx, cy, rx, ry } => {
                [cx, cy, rx, ry].iter().all(|v| v.is_finite())
            }
        }
    }
}

/// Shoelace formula, orientation independent
fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Selector {
        Selector::Polygon {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(size, 0.0),
                Point::new(size, size),
                Point::new(0.0, size),
            ],
        }
    }

    #[test]
    fn test_polygon_area_both_orientations() {
        assert_eq!(square(10.0).area(), 100.0);

        let Selector::Polygon { mut points } = square(10.0) else {
            unreachable!()
        };
        points.reverse();
        assert_eq!(Selector::Polygon { points }.area(), 100.0);
    }

    #[test]
    fn test_non_finite_geometry_detected() {
        assert!(square(10.0).is_finite());
        assert!(Selector::Point { x: 1.0, y: 2.0 }.is_finite());

        assert!(!Selector::Rect { x: 0.0, y: f64::NAN, width: 1.0, height: 1.0 }.is_finite());
        assert!(!Selector::Circle { cx: 0.0, cy: 0.0, r: f64::INFINITY }.is_finite());
        assert!(
            !Selector::Polygon {
                points: vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0), Point::new(1.0, 1.0)],
            }
            .is_finite()
        );
    }

    #[test]
    fn test_degenerate_polygon_has_no_area() {
        let line = Selector::Polygon {
            points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
        };
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_rect_and_circle_area() {
        let rect = Selector::Rect {
            x: 0.0,
            y: 0.0,
            width: 4.0,
            height: 5.0,
        };
        assert_eq!(rect.area(), 20.0);

        let circle = Selector::Circle {
            cx: 0.0,
            cy: 0.0,
            r: 2.0,
        };
        assert!((circle.area() - 4.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_per_kind() {
        let circle = Selector::Circle {
            cx: 10.0,
            cy: 20.0,
            r: 5.0,
        };
        assert_eq!(circle.bounds(), Bounds::from_rect(5.0, 15.0, 10.0, 10.0));

        let point = Selector::Point { x: 3.0, y: 4.0 };
        assert_eq!(point.bounds().width(), 0.0);

        let empty = Selector::Polygon { points: vec![] };
        assert_eq!(empty.bounds(), Bounds::default());
    }

    #[test]
    fn test_map_points_scales_radius() {
        let ellipse = Selector::Ellipse {
            cx: 1.0,
            cy: 1.0,
            rx: 2.0,
            ry: 3.0,
        };
        let scaled = ellipse.map_points(|p| Point::new(p.x * 2.0, p.y * 2.0));
        assert_eq!(
            scaled,
            Selector::Ellipse {
                cx: 2.0,
                cy: 2.0,
                rx: 4.0,
                ry: 6.0
            }
        );
    }

    #[test]
    fn test_translate_keeps_kind_and_area() {
        let moved = square(3.0).translate(100.0, -50.0);
        assert_eq!(moved.kind(), ShapeKind::Polygon);
        assert_eq!(moved.area(), 9.0);
        assert_eq!(moved.bounds().min_x, 100.0);
    }

    #[test]
    fn test_selector_json_is_tagged() {
        let json = serde_json::to_value(Selector::Point { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(json["type"], "point");
    }
}
