//! Projection between image space and viewport space
//!
//! Results are only meaningful for the viewer transform at the time of the call: a
//! pan or zoom between two projections invalidates the earlier one.

use crate::annotation::{Annotation, Target};
use crate::geometry::Selector;
use crate::layer::render_set::ShapeHandle;
use crate::viewer::Viewer;

pub fn selector_to_image<V: Viewer + ?Sized>(viewer: &V, selector: &Selector) -> Selector {
    selector.map_points(|p| viewer.element_to_image(p))
}

pub fn selector_to_viewport<V: Viewer + ?Sized>(viewer: &V, selector: &Selector) -> Selector {
    selector.map_points(|p| viewer.image_to_element(p))
}

/// Viewport-space target -> image-space target. The source is kept.
pub fn to_image<V: Viewer + ?Sized>(viewer: &V, target: &Target) -> Target {
    Target {
        source: target.source.clone(),
        selector: selector_to_image(viewer, &target.selector),
    }
}

/// Image-space target -> viewport-space target. The source is kept.
pub fn to_viewport<V: Viewer + ?Sized>(viewer: &V, target: &Target) -> Target {
    Target {
        source: target.source.clone(),
        selector: selector_to_viewport(viewer, &target.selector),
    }
}

/// Viewport-space geometry of an annotation
pub fn annotation_to_viewport<V: Viewer + ?Sized>(viewer: &V, annotation: &Annotation) -> Selector {
    selector_to_viewport(viewer, annotation.selector())
}

/// Re-derive a shape's on-screen geometry from its bound annotation
pub fn refresh_position<V: Viewer + ?Sized>(viewer: &V, shape: &mut ShapeHandle) {
    let geometry = annotation_to_viewport(viewer, shape.annotation());
    shape.element_mut().geometry = geometry;
}
