//! Viewport-windowed annotation layer over a gigapixel image

use std::collections::HashSet;

use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::annotation::{Annotation, AnnotationId};
use crate::config::LayerConfig;
use crate::drawing::{Element, Formatter, SelectorDrawer, ShapeDrawer};
use crate::geometry::Selector;
use crate::layer::AnnotationLayer;
use crate::layer::events::LayerEvent;
use crate::layer::hit::HitTester;
use crate::layer::index::AnnotationIndex;
use crate::layer::projection;
use crate::layer::render_set::{DrawContext, RenderSet, ShapeHandle};
use crate::layer::selection::{EditSession, Selection, SelectionController};
use crate::layer::tasks::{Deferred, TaskPhase, TaskQueue};
use crate::layer::types::{LayerError, SelectionMode};
use crate::tools::{EditableShape, ToolRegistry};
use crate::viewer::{ImageInfo, PointerEvent, PointerTracker, Viewer};

/// Annotation layer that only renders what intersects the viewport.
///
/// Owns the spatial index, the static render set and the selection state. Deferred work
/// of a selection swap is queued and runs on [`GigapixelLayer::end_task`] and
/// [`GigapixelLayer::settle`]; notifications are collected until
/// [`GigapixelLayer::drain_events`].
pub struct GigapixelLayer<V: Viewer> {
    viewer: V,
    image: ImageInfo,
    config: LayerConfig,
    index: AnnotationIndex,
    shapes: RenderSet,
    selection: SelectionController,
    hit: HitTester,
    tools: ToolRegistry,
    drawer: Box<dyn ShapeDrawer>,
    formatter: Option<Formatter>,
    draw_tracker: Box<dyn PointerTracker>,
    tasks: TaskQueue,
    events: Vec<LayerEvent>,
}

impl<V: Viewer> GigapixelLayer<V> {
    pub fn new(viewer: V, image: ImageInfo, config: LayerConfig) -> Self {
        let mut draw_tracker = viewer.create_tracker();
        draw_tracker.set_tracking(false);

        Self {
            hit: HitTester::new(config.touch_input),
            viewer,
            image,
            config,
            index: AnnotationIndex::new(),
            shapes: RenderSet::new(),
            selection: SelectionController::new(),
            tools: ToolRegistry::with_defaults(),
            drawer: Box::new(SelectorDrawer),
            formatter: None,
            draw_tracker,
            tasks: TaskQueue::new(),
            events: Vec::new(),
        }
    }

    pub fn with_drawer(mut self, drawer: impl ShapeDrawer + 'static) -> Self {
        self.drawer = Box::new(drawer);
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Replace all annotations. Any selection is dropped without restoring it.
    /// Annotations with non-finite geometry are skipped.
    pub fn init(&mut self, annotations: Vec<Annotation>) {
        self.end_task();
        self.cancel_selection();
        self.shapes.clear();

        self.index = AnnotationIndex::bulk_load(annotations.iter().cloned());
        for annotation in annotations {
            if self.index.contains(annotation.id()) {
                self.add_shape(annotation);
            }
        }

        info!(
            "Initialized annotation layer with {} annotations",
            self.index.len()
        );
        self.redraw();
    }

    /// Replace the annotation stored under `previous` (or under its own id) with `annotation`
    pub fn add_or_update_annotation(
        &mut self,
        annotation: Annotation,
        previous: Option<&AnnotationId>,
    ) -> Result<(), LayerError> {
        if !annotation.selector().is_finite() {
            return Err(LayerError::InvalidGeometry(annotation.id().clone()));
        }
        self.end_task();
        let previous = previous.unwrap_or(annotation.id()).clone();

        if self.selection.is_selected(&previous) {
            self.cancel_selection();
        }
        self.shapes.remove(&previous);
        self.index.delete(&previous);

        debug!("Replacing annotation {} with {}", previous, annotation.id());
        self.index.insert(annotation.clone())?;
        self.add_shape(annotation);
        self.redraw();
        Ok(())
    }

    /// Current annotation values, each exactly once. Unsaved drafts are excluded.
    pub fn get_annotations(&self) -> Vec<Annotation> {
        let mut annotations: Vec<Annotation> = self
            .shapes
            .iter()
            .map(|shape| shape.annotation().clone())
            .collect();
        if let Some(session) = self.selection.session()
            && !session.annotation().is_selection()
        {
            annotations.push(session.annotation().clone());
        }
        annotations
    }

    /// Topmost-by-area annotation under the pointer, in its current value
    pub fn get_shape_at(&self, event: &PointerEvent) -> Option<&Annotation> {
        let hit = self.hit.shape_at(
            &self.viewer,
            &self.index,
            self.drawer.as_ref(),
            &self.image,
            event,
        )?;

        match self.selection.session() {
            Some(session) if session.annotation().id() == hit.id() => Some(session.annotation()),
            _ => self
                .shapes
                .get(hit.id())
                .map(ShapeHandle::annotation)
                .or(Some(hit)),
        }
    }

    /// Select what is under the pointer, or deselect on a miss. Returns the hit id.
    pub fn handle_click(
        &mut self,
        event: &PointerEvent,
    ) -> Result<Option<AnnotationId>, LayerError> {
        let hit = self.get_shape_at(event).map(|a| a.id().clone());
        match &hit {
            Some(id) => self.select_shape(id)?,
            None => self.deselect(),
        }
        Ok(hit)
    }

    pub fn pointer_enter_editable(&mut self) -> bool {
        self.selection
            .session_mut()
            .is_some_and(|session| session.set_hover(true))
    }

    pub fn pointer_leave_editable(&mut self) -> bool {
        self.selection
            .session_mut()
            .is_some_and(|session| session.set_hover(false))
    }

    /// Rebind the edited annotation to a viewport-space fragment and refresh its index entry.
    /// A fragment with non-finite geometry is rejected before anything changes.
    pub fn apply_shape_update(&mut self, fragment: &Selector) -> Result<(), LayerError> {
        let session = self.selection.session_mut().ok_or(LayerError::NotEditing)?;
        if !projection::selector_to_image(&self.viewer, fragment).is_finite() {
            return Err(LayerError::InvalidGeometry(session.annotation().id().clone()));
        }
        let target = session.apply_update(&self.viewer, fragment);
        let annotation = session.annotation().clone();
        let element = session.element().clone();

        if self.index.contains(annotation.id()) {
            self.index.update(annotation)?;
        }
        self.emit(LayerEvent::UpdateTarget { element, target });
        Ok(())
    }

    /// Apply every state update the editable shape emitted since the last sync
    pub fn sync_edits(&mut self) -> Result<usize, LayerError> {
        let updates = match self.selection.session_mut() {
            Some(session) => session.take_updates(),
            None => return Ok(0),
        };
        for fragment in &updates {
            self.apply_shape_update(fragment)?;
        }
        Ok(updates.len())
    }

    pub fn editable_shape_mut(&mut self) -> Option<&mut dyn EditableShape> {
        self.selection.session_mut().map(EditSession::shape_mut)
    }

    pub fn editable_element(&self) -> Option<&Element> {
        self.selection.session().map(EditSession::element)
    }

    /// Select a freshly drawn shape. `draft` carries viewport-space geometry.
    pub fn on_drawing_complete(&mut self, draft: Annotation) -> Result<(), LayerError> {
        if self.config.read_only || self.config.headless {
            return Err(LayerError::DrawingDisabled);
        }

        let target = projection::to_image(&self.viewer, draft.target());
        if !target.selector.is_finite() {
            return Err(LayerError::InvalidGeometry(draft.id().clone()));
        }
        let annotation = draft.clone_with_target(target);

        self.end_task();
        self.select_annotation(annotation.clone(), false)?;
        self.emit(LayerEvent::CreateSelection { annotation });
        self.draw_tracker.set_tracking(false);
        Ok(())
    }

    /// Toggle the drawing tracker, which suppresses viewer gestures while enabled
    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        self.draw_tracker.set_tracking(enabled);
    }

    pub fn is_drawing_enabled(&self) -> bool {
        self.draw_tracker.is_tracking()
    }

    /// Run work deferred to the end of the current task
    pub fn end_task(&mut self) {
        self.run_phase(TaskPhase::EndOfTask);
    }

    /// Run all deferred work, end-of-task first
    pub fn settle(&mut self) {
        self.run_phase(TaskPhase::EndOfTask);
        self.run_phase(TaskPhase::Settle);
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<LayerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    pub fn shapes(&self) -> &RenderSet {
        &self.shapes
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        match self.selection.session() {
            Some(session) => Some(session.annotation()),
            None => self.shapes.selected().map(ShapeHandle::annotation),
        }
    }

    /// Painted ids, bottom first. The editable shape, if any, is on top.
    pub fn render_order(&self) -> Vec<AnnotationId> {
        let mut order = self.shapes.paint_order();
        if let Some(session) = self.selection.session() {
            order.push(session.annotation().id().clone());
        }
        order
    }

    /// Ids of every shape currently shown, selected one included
    pub fn visible_ids(&self) -> HashSet<AnnotationId> {
        let mut ids = self.shapes.visible_ids().clone();
        if let Some(id) = self.selection.selected_id() {
            ids.insert(id.clone());
        }
        ids
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Mutable viewer access. Call [`AnnotationLayer::resize`] after moving the viewport.
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    fn add_shape(&mut self, annotation: Annotation) {
        let ctx = DrawContext {
            viewer: &self.viewer,
            image: &self.image,
            drawer: self.drawer.as_ref(),
            formatter: self.formatter.as_ref(),
        };
        self.shapes.add(annotation, &ctx);
    }

    fn emit(&mut self, event: LayerEvent) {
        debug!("Emitting {} event", event.name());
        self.events.push(event);
    }

    fn run_phase(&mut self, phase: TaskPhase) {
        while let Some(task) = self.tasks.pop(phase) {
            match task {
                Deferred::RemoveStatic(id) => {
                    self.shapes.drop_retired(&id);
                }
                Deferred::EmitSelect(annotation) => {
                    let element = self
                        .selection
                        .session_for(annotation.id())
                        .map(|session| session.element().clone());
                    if let Some(element) = element {
                        self.emit(LayerEvent::Select {
                            annotation,
                            element,
                        });
                    }
                }
                Deferred::AttachListeners(id) => {
                    if let Some(session) = self.selection.session_for(&id) {
                        session.attach_listeners();
                        debug!("Attached listeners to editable shape {}", id);
                    }
                }
            }
        }
    }

    fn select_annotation(
        &mut self,
        annotation: Annotation,
        skip_event: bool,
    ) -> Result<(), LayerError> {
        if !skip_event && !annotation.is_selection() {
            self.emit(LayerEvent::ClickAnnotation {
                annotation: annotation.clone(),
            });
        }

        if self.selection.is_selected(annotation.id()) {
            return Ok(());
        }

        let read_only = self.config.read_only || annotation.is_read_only();
        let editable = !(read_only || self.config.headless);
        if editable && let Err(err) = self.tools.for_annotation(&annotation) {
            warn!("Cannot edit annotation {}: {}", annotation.id(), err);
            return Err(err);
        }

        if self.selection.is_active() {
            self.deselect_inner(false);
        }

        let id = annotation.id().clone();
        if editable {
            let factory = self.tools.for_annotation(&annotation)?;
            let session = EditSession::begin(annotation.clone(), factory, &self.viewer);

            self.shapes.retire(&id);
            self.tasks
                .schedule(TaskPhase::EndOfTask, Deferred::RemoveStatic(id.clone()));
            if !skip_event {
                self.tasks
                    .schedule(TaskPhase::EndOfTask, Deferred::EmitSelect(annotation));
            }
            self.tasks
                .schedule(TaskPhase::Settle, Deferred::AttachListeners(id.clone()));
            self.selection.set(Selection::Editable(session));

            counter!("pathcollab_annotation_selections_total", "mode" => "editable").increment(1);
            debug!("Selected annotation {} for editing", id);
        } else {
            self.shapes.set_selected(Some(&id));
            let element = self.shapes.get(&id).map(|shape| shape.element().clone());
            self.selection.set(Selection::ReadOnly(id.clone()));

            if !skip_event && let Some(element) = element {
                self.emit(LayerEvent::Select {
                    annotation,
                    element,
                });
            }

            counter!("pathcollab_annotation_selections_total", "mode" => "read_only").increment(1);
            debug!("Selected annotation {} read-only", id);
        }
        Ok(())
    }

    fn deselect_inner(&mut self, redraw: bool) {
        self.end_task();

        match self.selection.take() {
            Selection::Idle => return,
            Selection::ReadOnly(id) => {
                self.shapes.set_selected(None);
                debug!("Deselected annotation {}", id);
            }
            Selection::Editable(session) => {
                let id = session.annotation().id().clone();
                self.tasks.cancel(TaskPhase::Settle, &id);

                let annotation = session.teardown();
                if annotation.is_selection() {
                    debug!("Discarded draft {}", id);
                } else {
                    self.add_shape(annotation);
                    debug!("Committed edit of annotation {}", id);
                }
            }
        }

        if redraw {
            self.redraw();
        }
    }

    /// Drop the selection without restoring a static shape.
    /// Returns the last value of an edited annotation.
    fn cancel_selection(&mut self) -> Option<Annotation> {
        match self.selection.take() {
            Selection::Idle => None,
            Selection::ReadOnly(id) => {
                self.shapes.set_selected(None);
                self.shapes.get(&id).map(|shape| shape.annotation().clone())
            }
            Selection::Editable(session) => {
                let id = session.annotation().id().clone();
                self.tasks.cancel(TaskPhase::EndOfTask, &id);
                self.tasks.cancel(TaskPhase::Settle, &id);
                self.shapes.drop_retired(&id);
                debug!("Cancelled edit session of annotation {}", id);
                Some(session.teardown())
            }
        }
    }
}

impl<V: Viewer> AnnotationLayer for GigapixelLayer<V> {
    fn add_annotation(&mut self, annotation: Annotation) -> Result<(), LayerError> {
        self.index.insert(annotation.clone())?;
        if self.selection.is_selected(annotation.id()) {
            self.end_task();
            self.cancel_selection();
        }
        self.add_shape(annotation);
        Ok(())
    }

    fn remove_annotation(&mut self, id: &AnnotationId) -> Option<Annotation> {
        self.end_task();
        let edited = if self.selection.is_selected(id) {
            self.cancel_selection()
        } else {
            None
        };

        let shape = self.shapes.remove(id);
        let indexed = self.index.delete(id);
        debug!("Removed annotation {}", id);

        edited
            .or(indexed)
            .or_else(|| shape.map(|shape| shape.annotation().clone()))
    }

    fn select_shape(&mut self, id: &AnnotationId) -> Result<(), LayerError> {
        self.end_task();
        let annotation = match self.selection.session() {
            Some(session) if session.annotation().id() == id => session.annotation().clone(),
            _ => self
                .shapes
                .get(id)
                .map(|shape| shape.annotation().clone())
                .ok_or_else(|| LayerError::UnknownAnnotation(id.clone()))?,
        };
        self.select_annotation(annotation, false)
    }

    fn deselect(&mut self) {
        self.deselect_inner(true);
    }

    fn redraw(&mut self) {
        self.shapes.sort_by_area(self.drawer.as_ref(), &self.image);
        self.resize();
    }

    fn resize(&mut self) {
        let view = self.viewer.image_bounds();
        let in_view: HashSet<AnnotationId> = self
            .index
            .query(&view)
            .into_iter()
            .map(|annotation| annotation.id().clone())
            .collect();

        let shown = self.shapes.cull(&in_view, &self.viewer);
        histogram!("pathcollab_annotation_visible_shapes").record(shown as f64);

        let selected = match self.selection.state_mut() {
            Selection::Idle => None,
            Selection::ReadOnly(id) => self
                .shapes
                .refresh(id, &self.viewer)
                .map(|shape| shape.element().clone()),
            Selection::Editable(session) => {
                session.reproject(&self.viewer);
                Some(session.element().clone())
            }
        };
        if let Some(element) = selected {
            self.emit(LayerEvent::ViewportChange { element });
        }
    }
}
