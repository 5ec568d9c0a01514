//! Editable-shape tools
//!
//! A tool turns an annotation into an [`EditableShape`]: a temporary, directly
//! manipulable rendering that reports its geometry changes as viewport-space
//! fragments. Tools are looked up by geometry type in a [`ToolRegistry`].

pub mod drag;

pub use drag::DragShape;

use crate::annotation::Annotation;
use crate::drawing::Element;
use crate::geometry::{Selector, ShapeKind};
use crate::layer::LayerError;
use std::collections::HashMap;

/// Interactive rendering of a single annotation
pub trait EditableShape {
    fn element(&self) -> &Element;

    fn element_mut(&mut self) -> &mut Element;

    /// Place the shape at a viewport-space geometry without emitting an update
    fn update_state(&mut self, fragment: &Selector);

    /// Move the shape by a viewport-space offset, emitting an update
    fn drag(&mut self, dx: f64, dy: f64);

    /// Drain the state-update notifications emitted since the last call
    fn take_updates(&mut self) -> Vec<Selector>;
}

/// Builds an editable shape from an annotation in image coordinates
pub type EditableShapeFactory = Box<dyn Fn(&Annotation) -> Box<dyn EditableShape>>;

/// Editable-shape constructors keyed by geometry type
#[derive(Default)]
pub struct ToolRegistry {
    factories: HashMap<ShapeKind, EditableShapeFactory>,
}

impl ToolRegistry {
    /// Registry without any tool
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a [`DragShape`] tool for every geometry type
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in [
            ShapeKind::Rect,
            ShapeKind::Polygon,
            ShapeKind::Point,
            ShapeKind::Circle,
            ShapeKind::Ellipse,
        ] {
            registry.register(
                kind,
                Box::new(|a: &Annotation| -> Box<dyn EditableShape> {
                    Box::new(DragShape::new(a))
                }),
            );
        }
        registry
    }

    /// Register (or replace) the tool for a geometry type
    pub fn register(&mut self, kind: ShapeKind, factory: EditableShapeFactory) {
        self.factories.insert(kind, factory);
    }

    pub fn unregister(&mut self, kind: ShapeKind) -> bool {
        self.factories.remove(&kind).is_some()
    }

    pub fn supports(&self, kind: ShapeKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Tool for the annotation's geometry type
    pub fn for_annotation(
        &self,
        annotation: &Annotation,
    ) -> Result<&EditableShapeFactory, LayerError> {
        self.factories
            .get(&annotation.kind())
            .ok_or(LayerError::NoEditableTool(annotation.kind()))
    }
}
