//! PathCollab Annotation Layer
//!
//! Viewport-windowed rendering, hit testing and in-place editing of annotations on
//! gigapixel images. Annotations live in image coordinates; only those intersecting the
//! viewport are shown, and at most one is selected at a time.

pub mod annotation;
pub mod config;
pub mod drawing;
pub mod geometry;
pub mod layer;
pub mod scenario;
pub mod tools;
pub mod viewer;

// Re-export commonly used types
pub use annotation::{Annotation, AnnotationId, Target};
pub use config::LayerConfig;
pub use geometry::{Bounds, Point, Selector, ShapeKind};
pub use layer::{AnnotationLayer, GigapixelLayer, LayerError, LayerEvent, SelectionMode};
pub use viewer::{ImageInfo, PointerEvent, Viewer, ViewportTransform};
