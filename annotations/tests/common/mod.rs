//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

#![allow(dead_code)]

use pathcollab_annotations::{
    Annotation, AnnotationId, GigapixelLayer, ImageInfo, LayerConfig, LayerEvent, Point,
    Selector, Target, ViewportTransform,
};
use rand::Rng;

pub const IMAGE_SIZE: u64 = 100_000;

/// Rectangle annotation in image coordinates, sourced from the test slide
pub fn rect(id: &str, x: f64, y: f64, width: f64, height: f64) -> Annotation {
    Annotation::new(
        id,
        Target::new(Selector::Rect {
            x,
            y,
            width,
            height,
        })
        .with_source("test-slide"),
    )
}

pub fn create_test_image() -> ImageInfo {
    ImageInfo {
        width: IMAGE_SIZE,
        height: IMAGE_SIZE,
        source: Some("test-slide".to_string()),
    }
}

/// 800x600 viewer element showing the top-left of the image at full resolution
pub fn create_test_viewer() -> ViewportTransform {
    ViewportTransform::new(800.0, 600.0)
}

/// Layer initialized with the given annotations
pub fn create_test_layer(
    config: LayerConfig,
    annotations: Vec<Annotation>,
) -> GigapixelLayer<ViewportTransform> {
    let mut layer = GigapixelLayer::new(create_test_viewer(), create_test_image(), config);
    layer.init(annotations);
    layer
}

/// Random annotation of any geometry type inside a `extent` x `extent` square
pub fn random_annotation<R: Rng>(rng: &mut R, id: usize, extent: f64) -> Annotation {
    let x = rng.random_range(0.0..extent);
    let y = rng.random_range(0.0..extent);
    let size = rng.random_range(1.0..500.0);

    let selector = match rng.random_range(0..5) {
        0 => Selector::Rect {
            x,
            y,
            width: size,
            height: rng.random_range(1.0..500.0),
        },
        1 => Selector::Polygon {
            points: (0..rng.random_range(3..8))
                .map(|_| {
                    Point::new(
                        x + rng.random_range(0.0..size),
                        y + rng.random_range(0.0..size),
                    )
                })
                .collect(),
        },
        2 => Selector::Point { x, y },
        3 => Selector::Circle {
            cx: x,
            cy: y,
            r: size / 2.0,
        },
        _ => Selector::Ellipse {
            cx: x,
            cy: y,
            rx: size / 2.0,
            ry: rng.random_range(1.0..250.0),
        },
    };

    Annotation::new(format!("a{id:04}"), Target::new(selector).with_source("test-slide"))
}

pub fn random_annotations<R: Rng>(rng: &mut R, count: usize, extent: f64) -> Vec<Annotation> {
    (0..count)
        .map(|id| random_annotation(rng, id, extent))
        .collect()
}

pub fn event_names(events: &[LayerEvent]) -> Vec<&'static str> {
    events.iter().map(LayerEvent::name).collect()
}

pub fn sorted_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a AnnotationId>,
{
    let mut ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
    ids.sort();
    ids
}

/// No id appears twice
pub fn assert_unique(ids: &[AnnotationId]) {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        assert!(seen.insert(id), "{id} appears more than once");
    }
}
