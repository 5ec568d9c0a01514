//! Selection state and the editable-shape session

use crate::annotation::{Annotation, AnnotationId, Target};
use crate::drawing::{Element, SELECTED_CLASS};
use crate::geometry::Selector;
use crate::layer::projection;
use crate::layer::types::SelectionMode;
use crate::tools::{EditableShape, EditableShapeFactory};
use crate::viewer::{PointerTracker, Viewer};

/// Live editing of one annotation.
///
/// Owns the editable shape, the pointer tracker that suppresses viewer gestures while
/// the shape is hovered, and the current image-space value of the annotation.
pub struct EditSession {
    annotation: Annotation,
    shape: Box<dyn EditableShape>,
    tracker: Box<dyn PointerTracker>,
    listening: bool,
}

impl EditSession {
    /// Build the editable shape and place it at the annotation's current viewport position
    pub(crate) fn begin<V: Viewer + ?Sized>(
        annotation: Annotation,
        factory: &EditableShapeFactory,
        viewer: &V,
    ) -> Self {
        let mut shape = factory(&annotation);
        {
            let element = shape.element_mut();
            element.annotation_id = annotation.id().clone();
            element.add_class(SELECTED_CLASS);
            element.listening = false;
        }
        shape.update_state(&projection::annotation_to_viewport(viewer, &annotation));

        let mut tracker = viewer.create_tracker();
        tracker.set_tracking(false);

        Self {
            annotation,
            shape,
            tracker,
            listening: false,
        }
    }

    /// Current value of the edited annotation, in image coordinates
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn element(&self) -> &Element {
        self.shape.element()
    }

    pub fn shape_mut(&mut self) -> &mut dyn EditableShape {
        self.shape.as_mut()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Whether viewer gestures are currently suppressed by this session
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }

    /// Rebind the annotation to a viewport-space fragment. Returns the image-space target.
    pub(crate) fn apply_update<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        fragment: &Selector,
    ) -> Target {
        let target = Target {
            source: self.annotation.target().source.clone(),
            selector: projection::selector_to_image(viewer, fragment),
        };
        self.annotation = self.annotation.clone_with_target(target.clone());
        self.shape.update_state(fragment);
        target
    }

    /// Re-place the editable shape for the current viewer transform
    pub(crate) fn reproject<V: Viewer + ?Sized>(&mut self, viewer: &V) {
        let projected = projection::annotation_to_viewport(viewer, &self.annotation);
        self.shape.update_state(&projected);
    }

    pub(crate) fn take_updates(&mut self) -> Vec<Selector> {
        self.shape.take_updates()
    }

    pub(crate) fn attach_listeners(&mut self) {
        self.listening = true;
        self.shape.element_mut().listening = true;
    }

    /// Hover toggles the tracker. Ignored until listeners are attached.
    pub(crate) fn set_hover(&mut self, hovered: bool) -> bool {
        if !self.listening {
            return false;
        }
        self.tracker.set_tracking(hovered);
        true
    }

    /// Detach listeners, release the tracker and hand back the final annotation value
    pub(crate) fn teardown(mut self) -> Annotation {
        self.listening = false;
        self.shape.element_mut().listening = false;
        self.tracker.destroy();
        self.annotation
    }
}

/// At most one annotation is selected at any time
#[derive(Default)]
pub enum Selection {
    #[default]
    Idle,
    /// The static shape itself is the selected reference
    ReadOnly(AnnotationId),
    Editable(EditSession),
}

#[derive(Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        match self.state {
            Selection::Idle => SelectionMode::Idle,
            Selection::ReadOnly(_) => SelectionMode::SelectedReadOnly,
            Selection::Editable(_) => SelectionMode::SelectedEditable,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, Selection::Idle)
    }

    pub fn selected_id(&self) -> Option<&AnnotationId> {
        match &self.state {
            Selection::Idle => None,
            Selection::ReadOnly(id) => Some(id),
            Selection::Editable(session) => Some(session.annotation.id()),
        }
    }

    pub fn is_selected(&self, id: &AnnotationId) -> bool {
        self.selected_id() == Some(id)
    }

    pub fn state_mut(&mut self) -> &mut Selection {
        &mut self.state
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            Selection::Editable(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        match &mut self.state {
            Selection::Editable(session) => Some(session),
            _ => None,
        }
    }

    /// Session for `id`, if that annotation is the one being edited
    pub fn session_for(&mut self, id: &AnnotationId) -> Option<&mut EditSession> {
        self.session_mut()
            .filter(|session| session.annotation.id() == id)
    }

    pub(crate) fn set(&mut self, state: Selection) {
        self.state = state;
    }

    pub(crate) fn take(&mut self) -> Selection {
        std::mem::take(&mut self.state)
    }
}
