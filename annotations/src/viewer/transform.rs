//! Pan/zoom viewer transform
//!
//! A [`Viewer`] implementation for hosts that track pan and zoom themselves (and for
//! the replay binary). Viewport space is the viewer element's pixel grid; image space
//! is the full-resolution pixel grid.

use super::{PointerTracker, Viewer};
use crate::geometry::{Bounds, Point};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
struct TrackerState {
    tracking: Cell<bool>,
    destroyed: Cell<bool>,
}

/// Tracker whose state stays observable by the transform that created it
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    state: Rc<TrackerState>,
}

impl SharedTracker {
    fn suppresses_gestures(&self) -> bool {
        self.state.tracking.get() && !self.state.destroyed.get()
    }
}

impl PointerTracker for SharedTracker {
    fn set_tracking(&mut self, enabled: bool) {
        if !self.state.destroyed.get() {
            self.state.tracking.set(enabled);
        }
    }

    fn is_tracking(&self) -> bool {
        self.suppresses_gestures()
    }

    fn destroy(&mut self) {
        self.state.tracking.set(false);
        self.state.destroyed.set(true);
    }
}

/// Similarity transform between the viewer element and the image
#[derive(Debug, Clone)]
pub struct ViewportTransform {
    /// Image coordinates of the element's top-left corner
    origin: Point,
    /// Element pixels per image pixel
    zoom: f64,
    /// Element size in pixels
    element_width: f64,
    element_height: f64,
    /// Element position in client coordinates
    element_origin: Point,
    trackers: RefCell<Vec<SharedTracker>>,
}

impl ViewportTransform {
    /// Element of the given size showing the image at 1:1 from its top-left corner
    pub fn new(element_width: f64, element_height: f64) -> Self {
        Self {
            origin: Point::default(),
            zoom: 1.0,
            element_width,
            element_height,
            element_origin: Point::default(),
            trackers: RefCell::new(Vec::new()),
        }
    }

    pub fn with_view(mut self, origin: Point, zoom: f64) -> Self {
        self.origin = origin;
        self.set_zoom(zoom);
        self
    }

    pub fn with_element_origin(mut self, element_origin: Point) -> Self {
        self.element_origin = element_origin;
        self
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Pan by a distance in image pixels
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.origin = Point::new(self.origin.x + dx, self.origin.y + dy);
    }

    pub fn pan_to(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Zoom is clamped to a small positive minimum so the transform stays invertible
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.max(f64::EPSILON);
    }

    /// Multiply zoom by `factor`, keeping the image point `around` fixed on screen
    pub fn zoom_by(&mut self, factor: f64, around: Point) {
        let anchor = self.image_to_element(around);
        self.set_zoom(self.zoom * factor);
        self.origin = Point::new(
            around.x - anchor.x / self.zoom,
            around.y - anchor.y / self.zoom,
        );
    }

    /// Whether any live tracker currently suppresses viewer gestures
    pub fn gestures_suppressed(&self) -> bool {
        self.trackers
            .borrow()
            .iter()
            .any(SharedTracker::suppresses_gestures)
    }

    /// Number of trackers that have not been destroyed
    pub fn live_trackers(&self) -> usize {
        self.trackers
            .borrow()
            .iter()
            .filter(|t| !t.state.destroyed.get())
            .count()
    }
}

impl Viewer for ViewportTransform {
    fn element_to_image(&self, point: Point) -> Point {
        Point::new(
            self.origin.x + point.x / self.zoom,
            self.origin.y + point.y / self.zoom,
        )
    }

    fn image_to_element(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.origin.x) * self.zoom,
            (point.y - self.origin.y) * self.zoom,
        )
    }

    fn image_bounds(&self) -> Bounds {
        Bounds::from_rect(
            self.origin.x,
            self.origin.y,
            self.element_width / self.zoom,
            self.element_height / self.zoom,
        )
    }

    fn element_origin(&self) -> Point {
        self.element_origin
    }

    fn create_tracker(&self) -> Box<dyn PointerTracker> {
        let tracker = SharedTracker::default();
        let mut trackers = self.trackers.borrow_mut();
        trackers.retain(|t| !t.state.destroyed.get());
        trackers.push(tracker.clone());
        Box::new(tracker)
    }
}
