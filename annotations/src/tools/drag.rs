//! Translate-only editable shape

use super::EditableShape;
use crate::annotation::Annotation;
use crate::drawing::{Element, SELECTED_CLASS};
use crate::geometry::Selector;

/// Editable shape that supports moving the whole geometry.
///
/// Works for every geometry type; per-type resize handles belong to dedicated tools.
#[derive(Debug, Clone)]
pub struct DragShape {
    element: Element,
    pending: Vec<Selector>,
}

impl DragShape {
    /// Shape bound to the annotation, initially at its image-space geometry
    pub fn new(annotation: &Annotation) -> Self {
        let mut element = Element::new(annotation.id().clone(), annotation.selector().clone());
        element.add_class(SELECTED_CLASS);
        Self {
            element,
            pending: Vec::new(),
        }
    }

    /// Replace the geometry as a result of direct manipulation, emitting an update
    pub fn reshape(&mut self, geometry: Selector) {
        self.element.geometry = geometry.clone();
        self.pending.push(geometry);
    }
}

impl EditableShape for DragShape {
    fn element(&self) -> &Element {
        &self.element
    }

    fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    fn update_state(&mut self, fragment: &Selector) {
        self.element.geometry = fragment.clone();
    }

    fn drag(&mut self, dx: f64, dy: f64) {
        let moved = self.element.geometry.translate(dx, dy);
        self.reshape(moved);
    }

    fn take_updates(&mut self) -> Vec<Selector> {
        std::mem::take(&mut self.pending)
    }
}
