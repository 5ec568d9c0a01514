//! Annotation layer: spatial index, render set, hit testing and selection

pub mod events;
pub mod gigapixel;
pub mod hit;
pub mod index;
pub mod projection;
pub mod render_set;
pub mod selection;
pub mod tasks;
pub mod types;

pub use events::LayerEvent;
pub use gigapixel::GigapixelLayer;
pub use hit::HitTester;
pub use index::{AnnotationIndex, IndexEntry};
pub use render_set::{RenderSet, ShapeHandle};
pub use selection::{EditSession, SelectionController};
pub use tasks::{Deferred, TaskPhase, TaskQueue};
pub use types::{LayerError, SelectionMode};

use crate::annotation::{Annotation, AnnotationId};

/// Operations every annotation layer offers to its host
pub trait AnnotationLayer {
    /// Index and draw an annotation. Call [`AnnotationLayer::redraw`] to restore paint order.
    /// Non-finite geometry is rejected with [`LayerError::InvalidGeometry`].
    fn add_annotation(&mut self, annotation: Annotation) -> Result<(), LayerError>;

    /// Remove an annotation, cancelling an edit in progress on it
    fn remove_annotation(&mut self, id: &AnnotationId) -> Option<Annotation>;

    fn select_shape(&mut self, id: &AnnotationId) -> Result<(), LayerError>;

    fn deselect(&mut self);

    /// Recompute paint order, then resize
    fn redraw(&mut self);

    /// Cull to the current viewport and re-place what is shown
    fn resize(&mut self);
}
