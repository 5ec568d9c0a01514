//! Layer-related types and error definitions

use crate::annotation::AnnotationId;
use crate::geometry::ShapeKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when driving the annotation layer
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("No editable shape tool registered for {0:?} geometry")]
    NoEditableTool(ShapeKind),

    #[error("Annotation not found: {0}")]
    UnknownAnnotation(AnnotationId),

    #[error("No annotation is being edited")]
    NotEditing,

    #[error("Drawing is disabled on a read-only or headless layer")]
    DrawingDisabled,

    #[error("Annotation {0} has non-finite geometry")]
    InvalidGeometry(AnnotationId),
}

/// Observable state of the selection controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Idle,
    SelectedReadOnly,
    SelectedEditable,
}
