//! Zoomable image viewer capability
//!
//! The annotation layer never pans or zooms by itself. It relies on a [`Viewer`] to
//! convert between viewer-element pixels (viewport space) and full-resolution image
//! pixels (image space), and to provide pointer trackers that can suppress the
//! viewer's own gestures.

pub mod transform;

pub use transform::{SharedTracker, ViewportTransform};

use crate::geometry::{Bounds, Point};
use serde::{Deserialize, Serialize};

/// Pointer-tracking scope over the viewer element.
///
/// While tracking is enabled the viewer's pan/zoom gestures are suppressed.
pub trait PointerTracker {
    fn set_tracking(&mut self, enabled: bool);

    fn is_tracking(&self) -> bool;

    /// Release the tracker. A destroyed tracker never suppresses gestures again.
    fn destroy(&mut self);
}

/// Coordinate conversion and tracking primitives of the image viewer
pub trait Viewer {
    /// Viewer-element pixel -> image pixel
    fn element_to_image(&self, point: Point) -> Point;

    /// Image pixel -> viewer-element pixel
    fn image_to_element(&self, point: Point) -> Point;

    /// Currently visible window, in image coordinates
    fn image_bounds(&self) -> Bounds;

    /// Position of the viewer element in client (page) coordinates
    fn element_origin(&self) -> Point;

    /// New tracker scoped to the whole viewer element, initially disabled
    fn create_tracker(&self) -> Box<dyn PointerTracker>;
}

/// Metadata of the full-resolution image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Full resolution width in pixels
    pub width: u64,
    /// Full resolution height in pixels
    pub height: u64,
    /// Image source identifier used as annotation target source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ImageInfo {
    pub fn new(width: u64, height: u64) -> Self {
        Self {
            width,
            height,
            source: None,
        }
    }
}

/// Pointer event as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Position in client (page) coordinates
    pub client: Point,
    /// Position relative to the viewer element. Not reliable for touch input.
    pub offset: Point,
}

impl PointerEvent {
    pub fn new(client: Point, offset: Point) -> Self {
        Self { client, offset }
    }

    /// Event at an element-relative position, for an element placed at the client origin
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), Point::new(x, y))
    }
}
