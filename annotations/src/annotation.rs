//! Annotation values
//!
//! Annotations are immutable: an edit produces a new value through
//! [`Annotation::clone_with_target`], which keeps the identifier.

use crate::geometry::{Bounds, Selector, ShapeKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable annotation identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh identifier for drafted shapes that have not been persisted yet
    pub fn generate() -> Self {
        Self(format!("#{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AnnotationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What an annotation points at: an image source and a shape on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub selector: Selector,
}

impl Target {
    pub fn new(selector: Selector) -> Self {
        Self {
            source: None,
            selector,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Annotation with its target in image coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    id: AnnotationId,
    target: Target,
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    is_selection: bool,
}

impl Annotation {
    pub fn new(id: impl Into<AnnotationId>, target: Target) -> Self {
        Self {
            id: id.into(),
            target,
            read_only: false,
            is_selection: false,
        }
    }

    /// Candidate annotation produced by a drawing tool, not yet committed
    pub fn draft(target: Target) -> Self {
        Self {
            id: AnnotationId::generate(),
            target,
            read_only: false,
            is_selection: true,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn selector(&self) -> &Selector {
        &self.target.selector
    }

    pub fn kind(&self) -> ShapeKind {
        self.target.selector.kind()
    }

    pub fn bounds(&self) -> Bounds {
        self.target.selector.bounds()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_selection(&self) -> bool {
        self.is_selection
    }

    /// New value carrying `target`; identifier and flags are preserved
    pub fn clone_with_target(&self, target: Target) -> Self {
        Self {
            id: self.id.clone(),
            target,
            read_only: self.read_only,
            is_selection: self.is_selection,
        }
    }
}
