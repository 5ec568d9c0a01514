//! Shape drawing: annotation -> renderable element

use crate::annotation::{Annotation, AnnotationId};
use crate::geometry::Selector;
use crate::viewer::ImageInfo;
use serde::{Deserialize, Serialize};

/// Class carried by every annotation element
pub const ANNOTATION_CLASS: &str = "a9s-annotation";
/// Class carried by the selected element
pub const SELECTED_CLASS: &str = "selected";

/// Renderable primitive on the annotation surface.
///
/// Only the annotation identifier is stored here; the annotation value itself is owned
/// by the shape handle or the edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub annotation_id: AnnotationId,
    /// Geometry in the coordinate system the element is currently placed in
    pub geometry: Selector,
    pub classes: Vec<String>,
    pub visible: bool,
    /// Whether pointer listeners are attached
    pub listening: bool,
}

impl Element {
    pub fn new(annotation_id: AnnotationId, geometry: Selector) -> Self {
        Self {
            annotation_id,
            geometry,
            classes: vec![ANNOTATION_CLASS.to_string()],
            visible: true,
            listening: false,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}

/// Host-supplied styling hook, returns extra classes for an annotation
pub type Formatter = Box<dyn Fn(&Annotation) -> Vec<String>>;

/// Turns annotations into elements and measures them
pub trait ShapeDrawer {
    /// Element for the annotation, with geometry in image coordinates
    fn draw(&self, annotation: &Annotation, image: &ImageInfo) -> Element;

    /// Geometric area used for draw order and hit-test tie-breaks
    fn area(&self, annotation: &Annotation, image: &ImageInfo) -> f64;
}

/// Draws the selector as-is and measures its exact area
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorDrawer;

impl ShapeDrawer for SelectorDrawer {
    fn draw(&self, annotation: &Annotation, _image: &ImageInfo) -> Element {
        Element::new(annotation.id().clone(), annotation.selector().clone())
    }

    fn area(&self, annotation: &Annotation, _image: &ImageInfo) -> f64 {
        annotation.selector().area()
    }
}

/// Apply the formatter's classes to an element
pub fn format(element: &mut Element, annotation: &Annotation, formatter: Option<&Formatter>) {
    if let Some(formatter) = formatter {
        for class in formatter(annotation) {
            element.add_class(&class);
        }
    }
}
