//! Outbound layer notifications

use serde::Serialize;

use crate::annotation::{Annotation, Target};
use crate::drawing::Element;

/// Notification emitted by the layer, drained by the host in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum LayerEvent {
    /// A freshly drawn shape became a candidate annotation (not committed yet)
    CreateSelection { annotation: Annotation },
    /// An annotation was selected; `element` is the editable or static element
    Select {
        annotation: Annotation,
        element: Element,
    },
    /// An existing annotation was clicked
    ClickAnnotation { annotation: Annotation },
    /// The edited annotation's geometry changed; `target` is in image coordinates
    UpdateTarget { element: Element, target: Target },
    /// The viewport moved while an annotation was selected
    ViewportChange { element: Element },
}

impl LayerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LayerEvent::CreateSelection { .. } => "createSelection",
            LayerEvent::Select { .. } => "select",
            LayerEvent::ClickAnnotation { .. } => "clickAnnotation",
            LayerEvent::UpdateTarget { .. } => "updateTarget",
            LayerEvent::ViewportChange { .. } => "viewportChange",
        }
    }
}
