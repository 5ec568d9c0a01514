//! Rendered shape handles, paint order and viewport culling

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::annotation::{Annotation, AnnotationId};
use crate::drawing::{self, Element, Formatter, SELECTED_CLASS, ShapeDrawer};
use crate::layer::projection;
use crate::viewer::{ImageInfo, Viewer};

/// Renderable shape bound to exactly one annotation value
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeHandle {
    annotation: Annotation,
    element: Element,
}

impl ShapeHandle {
    pub(crate) fn new(annotation: Annotation, element: Element) -> Self {
        Self {
            annotation,
            element,
        }
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub(crate) fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }
}

/// Everything a render pass needs besides the shapes themselves
pub struct DrawContext<'a, V: Viewer + ?Sized> {
    pub viewer: &'a V,
    pub image: &'a ImageInfo,
    pub drawer: &'a dyn ShapeDrawer,
    pub formatter: Option<&'a Formatter>,
}

/// Static (non-editable) shapes on the render surface.
///
/// Surface order is paint order, bottom first. A statically selected shape stays in the
/// map but always paints last. Retired shapes were superseded by an editable shape and
/// wait for their deferred removal: they are hidden, without listeners, and excluded
/// from paint order.
#[derive(Debug, Default)]
pub struct RenderSet {
    shapes: IndexMap<AnnotationId, ShapeHandle>,
    retired: IndexMap<AnnotationId, ShapeHandle>,
    /// Unselected shapes currently shown
    visible: HashSet<AnnotationId>,
    selected: Option<AnnotationId>,
}

impl RenderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw, place and attach a shape on top of the surface. It is shown only if it
    /// intersects the current view.
    pub fn add<V: Viewer + ?Sized>(
        &mut self,
        annotation: Annotation,
        ctx: &DrawContext<'_, V>,
    ) -> &ShapeHandle {
        let id = annotation.id().clone();
        self.remove(&id);

        let mut element = ctx.drawer.draw(&annotation, ctx.image);
        drawing::format(&mut element, &annotation, ctx.formatter);
        let shown = annotation.bounds().intersects(&ctx.viewer.image_bounds());
        element.visible = shown;
        element.listening = true;

        let mut shape = ShapeHandle::new(annotation, element);
        projection::refresh_position(ctx.viewer, &mut shape);

        if shown {
            self.visible.insert(id.clone());
        }
        self.shapes.entry(id).or_insert(shape)
    }

    /// Remove a shape from the surface, retired or not
    pub fn remove(&mut self, id: &AnnotationId) -> Option<ShapeHandle> {
        self.visible.remove(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.retired.shift_remove(id);
        self.shapes.shift_remove(id)
    }

    /// Take a shape out of paint order pending its removal. Listeners are detached.
    pub fn retire(&mut self, id: &AnnotationId) -> bool {
        self.visible.remove(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        match self.shapes.shift_remove(id) {
            Some(mut shape) => {
                shape.element.listening = false;
                shape.element.visible = false;
                self.retired.insert(id.clone(), shape);
                true
            }
            None => false,
        }
    }

    pub fn drop_retired(&mut self, id: &AnnotationId) -> Option<ShapeHandle> {
        self.retired.shift_remove(id)
    }

    pub fn is_retired(&self, id: &AnnotationId) -> bool {
        self.retired.contains_key(id)
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&ShapeHandle> {
        self.shapes.get(id)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Mark a static shape as the selected one, or clear the mark
    pub fn set_selected(&mut self, id: Option<&AnnotationId>) {
        if let Some(previous) = self.selected.take()
            && let Some(shape) = self.shapes.get_mut(&previous)
        {
            shape.element.remove_class(SELECTED_CLASS);
            if shape.element.visible {
                self.visible.insert(previous);
            }
        }
        if let Some(id) = id
            && let Some(shape) = self.shapes.get_mut(id)
        {
            shape.element.add_class(SELECTED_CLASS);
            shape.element.visible = true;
            self.visible.remove(id);
            self.selected = Some(id.clone());
        }
    }

    pub fn selected(&self) -> Option<&ShapeHandle> {
        self.selected.as_ref().and_then(|id| self.shapes.get(id))
    }

    /// Sort by descending area so smaller shapes paint above the larger ones they sit in
    pub fn sort_by_area(&mut self, drawer: &dyn ShapeDrawer, image: &ImageInfo) {
        let mut entries: Vec<(f64, AnnotationId, ShapeHandle)> = std::mem::take(&mut self.shapes)
            .into_iter()
            .map(|(id, shape)| (drawer.area(&shape.annotation, image), id, shape))
            .collect();
        // Stable, so equal areas keep their insertion order
        entries.sort_by(|a, b| b.0.total_cmp(&a.0));

        self.shapes = entries
            .into_iter()
            .map(|(_, id, shape)| (id, shape))
            .collect();
    }

    /// Show exactly the unselected shapes in `in_view` and re-place them.
    ///
    /// Work is proportional to the shapes shown before and after the pass, not to the
    /// size of the surface. Returns the number of shapes shown.
    pub fn cull<V: Viewer + ?Sized>(
        &mut self,
        in_view: &HashSet<AnnotationId>,
        viewer: &V,
    ) -> usize {
        let hidden: Vec<AnnotationId> = self.visible.difference(in_view).cloned().collect();
        for id in &hidden {
            if let Some(shape) = self.shapes.get_mut(id) {
                shape.element.visible = false;
            }
            self.visible.remove(id);
        }

        for id in in_view {
            if self.selected.as_ref() == Some(id) {
                continue;
            }
            if let Some(shape) = self.shapes.get_mut(id) {
                shape.element.visible = true;
                projection::refresh_position(viewer, shape);
                self.visible.insert(id.clone());
            }
        }

        debug!(
            "Culled annotation surface: {} shown, {} hidden",
            self.visible.len(),
            hidden.len()
        );
        self.visible.len()
    }

    /// Re-place a single shape regardless of visibility
    pub fn refresh<V: Viewer + ?Sized>(
        &mut self,
        id: &AnnotationId,
        viewer: &V,
    ) -> Option<&ShapeHandle> {
        let shape = self.shapes.get_mut(id)?;
        projection::refresh_position(viewer, shape);
        Some(shape)
    }

    /// Ids in paint order, bottom first, selected shape last. Retired shapes excluded.
    pub fn paint_order(&self) -> Vec<AnnotationId> {
        let mut order: Vec<AnnotationId> = self
            .shapes
            .keys()
            .filter(|id| self.selected.as_ref() != Some(*id))
            .cloned()
            .collect();
        order.extend(self.selected.iter().cloned());
        order
    }

    /// Unselected shapes currently shown
    pub fn visible_ids(&self) -> &HashSet<AnnotationId> {
        &self.visible
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeHandle> {
        self.shapes.values()
    }

    /// Shapes in paint order (retired shapes excluded)
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes attached to the surface, including those awaiting removal
    pub fn surface_len(&self) -> usize {
        self.shapes.len() + self.retired.len()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.retired.clear();
        self.visible.clear();
        self.selected = None;
    }
}
