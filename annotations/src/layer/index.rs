//! Spatial indexing for viewport culling and hit testing using R-tree

use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::annotation::{Annotation, AnnotationId};
use crate::geometry::Bounds;
use crate::layer::types::LayerError;

/// Entry in the spatial index: image-space bounding box plus the annotation it covers
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Bounding box of the annotation's current geometry
    pub bounds: Bounds,
    pub annotation: Annotation,
}

impl IndexEntry {
    pub fn new(annotation: Annotation) -> Self {
        Self {
            bounds: annotation.bounds(),
            annotation,
        }
    }
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        to_envelope(&self.bounds)
    }
}

fn to_envelope(bounds: &Bounds) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [bounds.min_x, bounds.min_y],
        [bounds.max_x, bounds.max_y],
    )
}

/// Spatial index over annotation bounding boxes.
///
/// Holds exactly one entry per annotation id. Annotations with non-finite geometry are
/// never indexed.
#[derive(Debug, Default)]
pub struct AnnotationIndex {
    tree: RTree<IndexEntry>,
    entries: HashMap<AnnotationId, IndexEntry>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index in one pass. Later duplicates of an id win; annotations with
    /// non-finite geometry are skipped.
    pub fn bulk_load<I>(annotations: I) -> Self
    where
        I: IntoIterator<Item = Annotation>,
    {
        let mut entries = HashMap::new();
        for annotation in annotations {
            if !annotation.selector().is_finite() {
                warn!("Skipping annotation {} with non-finite geometry", annotation.id());
                continue;
            }
            entries.insert(annotation.id().clone(), IndexEntry::new(annotation));
        }

        let tree = RTree::bulk_load(entries.values().cloned().collect());
        debug!("Bulk loaded spatial index with {} entries", entries.len());

        Self { tree, entries }
    }

    /// Insert an annotation, replacing any entry with the same id.
    ///
    /// Non-finite geometry is rejected and leaves the index unchanged.
    pub fn insert(&mut self, annotation: Annotation) -> Result<(), LayerError> {
        if !annotation.selector().is_finite() {
            return Err(LayerError::InvalidGeometry(annotation.id().clone()));
        }
        let entry = IndexEntry::new(annotation);
        if let Some(previous) = self.entries.insert(entry.annotation.id().clone(), entry.clone()) {
            self.tree.remove(&previous);
        }
        self.tree.insert(entry);
        Ok(())
    }

    /// Remove the entry for `id`, returning the annotation it held
    pub fn delete(&mut self, id: &AnnotationId) -> Option<Annotation> {
        let entry = self.entries.remove(id)?;
        self.tree.remove(&entry);
        Some(entry.annotation)
    }

    /// Replace the entry for the annotation's id with its current geometry.
    /// On non-finite geometry the old entry is kept.
    pub fn update(&mut self, annotation: Annotation) -> Result<(), LayerError> {
        self.insert(annotation)
    }

    /// Annotations whose bounding box intersects `rect` (closed intervals)
    pub fn query(&self, rect: &Bounds) -> Vec<&Annotation> {
        self.tree
            .locate_in_envelope_intersecting(&to_envelope(rect))
            .map(|entry| &entry.annotation)
            .collect()
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.entries.get(id).map(|entry| &entry.annotation)
    }

    pub fn bounds(&self, id: &AnnotationId) -> Option<Bounds> {
        self.entries.get(id).map(|entry| entry.bounds)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.entries.contains_key(id)
    }

    /// Get total number of entries in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.values().map(|entry| &entry.annotation)
    }
}
