//! Scripted interaction scenarios
//!
//! A scenario describes an image, an initial viewport, the annotations to load and a
//! list of user steps. Each step runs as one task of the host event loop: work deferred
//! to the end of the task runs after it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::{Annotation, AnnotationId, Target};
use crate::config::LayerConfig;
use crate::geometry::{Point, Selector};
use crate::layer::{AnnotationLayer, GigapixelLayer, LayerError, LayerEvent, SelectionMode};
use crate::viewer::{ImageInfo, PointerEvent, Viewer, ViewportTransform};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub image: ImageInfo,
    #[serde(default)]
    pub viewport: ViewportSpec,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Initial viewer element size and view
#[derive(Debug, Clone, Deserialize)]
pub struct ViewportSpec {
    pub width: f64,
    pub height: f64,
    /// Image point at the top-left corner of the element
    #[serde(default)]
    pub origin: Point,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Element position in client coordinates
    #[serde(default)]
    pub element_origin: Point,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            origin: Point::default(),
            zoom: default_zoom(),
            element_origin: Point::default(),
        }
    }
}

impl ViewportSpec {
    fn build(&self) -> ViewportTransform {
        ViewportTransform::new(self.width, self.height)
            .with_view(self.origin, self.zoom)
            .with_element_origin(self.element_origin)
    }
}

/// One user interaction. Positions are relative to the viewer element.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Pan by a distance in image pixels
    Pan { dx: f64, dy: f64 },
    /// Zoom around an image point, the viewport center by default
    Zoom {
        factor: f64,
        #[serde(default)]
        around: Option<Point>,
    },
    Click { x: f64, y: f64 },
    Select { id: AnnotationId },
    Deselect,
    /// Drag the editable shape by a viewport offset
    Drag { dx: f64, dy: f64 },
    Hover { inside: bool },
    /// Finish drawing a shape given in viewport coordinates
    Draw { selector: Selector },
    Remove { id: AnnotationId },
    /// Let all deferred work run
    Settle,
}

/// Outcome of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub events: Vec<LayerEvent>,
    pub selection: SelectionMode,
    pub selected: Option<AnnotationId>,
    /// Painted ids, bottom first
    pub render_order: Vec<AnnotationId>,
    /// Shown ids, sorted
    pub visible: Vec<AnnotationId>,
    /// Final annotation values, sorted by id
    pub annotations: Vec<Annotation>,
}

/// Replay a scenario against a fresh layer
pub fn run(scenario: Scenario, config: LayerConfig) -> Result<ScenarioReport, LayerError> {
    let mut layer = GigapixelLayer::new(scenario.viewport.build(), scenario.image.clone(), config);
    layer.init(scenario.annotations);

    for (i, step) in scenario.steps.into_iter().enumerate() {
        debug!("Running step {}: {:?}", i, step);
        apply(&mut layer, &scenario.image, step)?;
    }
    layer.settle();

    let mut visible: Vec<AnnotationId> = layer.visible_ids().into_iter().collect();
    visible.sort();
    let mut annotations = layer.get_annotations();
    annotations.sort_by(|a, b| a.id().cmp(b.id()));

    Ok(ScenarioReport {
        events: layer.drain_events(),
        selection: layer.selection_mode(),
        selected: layer.selected_annotation().map(|a| a.id().clone()),
        render_order: layer.render_order(),
        visible,
        annotations,
    })
}

fn apply(
    layer: &mut GigapixelLayer<ViewportTransform>,
    image: &ImageInfo,
    step: Step,
) -> Result<(), LayerError> {
    match step {
        Step::Pan { dx, dy } => {
            layer.viewer_mut().pan_by(dx, dy);
            layer.resize();
        }
        Step::Zoom { factor, around } => {
            let around = around.unwrap_or_else(|| {
                let view = layer.viewer().image_bounds();
                Point::new(
                    (view.min_x + view.max_x) / 2.0,
                    (view.min_y + view.max_y) / 2.0,
                )
            });
            layer.viewer_mut().zoom_by(factor, around);
            layer.resize();
        }
        Step::Click { x, y } => {
            let origin = layer.viewer().element_origin();
            let event = PointerEvent::new(Point::new(x + origin.x, y + origin.y), Point::new(x, y));
            layer.handle_click(&event)?;
        }
        Step::Select { id } => layer.select_shape(&id)?,
        Step::Deselect => layer.deselect(),
        Step::Drag { dx, dy } => {
            layer
                .editable_shape_mut()
                .ok_or(LayerError::NotEditing)?
                .drag(dx, dy);
            layer.sync_edits()?;
        }
        Step::Hover { inside } => {
            if inside {
                layer.pointer_enter_editable();
            } else {
                layer.pointer_leave_editable();
            }
        }
        Step::Draw { selector } => {
            layer.set_drawing_enabled(true);
            let target = Target {
                source: image.source.clone(),
                selector,
            };
            layer.on_drawing_complete(Annotation::draft(target))?;
        }
        Step::Remove { id } => {
            layer.remove_annotation(&id);
        }
        Step::Settle => {
            layer.settle();
            return Ok(());
        }
    }

    layer.end_task();
    Ok(())
}
