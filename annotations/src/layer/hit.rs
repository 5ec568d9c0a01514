//! Pointer hit testing against the spatial index

use metrics::counter;

use crate::annotation::Annotation;
use crate::drawing::ShapeDrawer;
use crate::geometry::{Bounds, Point};
use crate::layer::index::AnnotationIndex;
use crate::viewer::{ImageInfo, PointerEvent, Viewer};

/// Resolves the annotation under a pointer.
///
/// Whether positions come from a touch device is decided once, at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitTester {
    touch_input: bool,
}

impl HitTester {
    pub fn new(touch_input: bool) -> Self {
        Self { touch_input }
    }

    pub fn touch_input(&self) -> bool {
        self.touch_input
    }

    /// Pointer position relative to the viewer element
    pub fn element_position<V: Viewer + ?Sized>(
        &self,
        viewer: &V,
        event: &PointerEvent,
    ) -> Point {
        if self.touch_input {
            // Touch offsets are not populated, derive them from client coordinates
            let origin = viewer.element_origin();
            Point::new(event.client.x - origin.x, event.client.y - origin.y)
        } else {
            event.offset
        }
    }

    /// Pointer position in image coordinates
    pub fn image_point<V: Viewer + ?Sized>(&self, viewer: &V, event: &PointerEvent) -> Point {
        viewer.element_to_image(self.element_position(viewer, event))
    }

    /// Smallest-area annotation whose bounding box contains the pointer.
    ///
    /// Equal areas are ordered by identifier.
    pub fn shape_at<'a, V: Viewer + ?Sized>(
        &self,
        viewer: &V,
        index: &'a AnnotationIndex,
        drawer: &dyn ShapeDrawer,
        image: &ImageInfo,
        event: &PointerEvent,
    ) -> Option<&'a Annotation> {
        let point = self.image_point(viewer, event);
        let hit = index
            .query(&Bounds::from_point(point))
            .into_iter()
            .map(|a| (drawer.area(a, image), a))
            .min_by(|(area_a, a), (area_b, b)| {
                area_a.total_cmp(area_b).then_with(|| a.id().cmp(b.id()))
            })
            .map(|(_, a)| a);

        let result = if hit.is_some() { "hit" } else { "miss" };
        counter!("pathcollab_annotation_hit_tests_total", "result" => result).increment(1);
        hit
    }
}
