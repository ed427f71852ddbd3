use geo::{Area, Contains, Coord};
use geo_clipper::Clipper;
use ndarray::{Array1, Array2};
use tracing::instrument;

use crate::{util::Extent, BoundingBox, MergeOptions};

/// Clipper works on integer coordinates; sub-pixel precision of 1/1024 is
/// kept when scaling.
const CLIPPER_FACTOR: f64 = 1024.0;

/// Intersection over union estimated on a sampling grid spanning both boxes.
pub fn calculate_iou(box1: &BoundingBox, box2: &BoundingBox) -> f64 {
    calculate_iou_with_resolution(box1, box2, MergeOptions::default().iou_grid_resolution)
}

/// Samples `resolution x resolution` evenly spaced points over the combined
/// extent of both boxes and counts those strictly inside each polygon.
#[instrument(level = "trace", skip(box1, box2))]
pub fn calculate_iou_with_resolution(
    box1: &BoundingBox,
    box2: &BoundingBox,
    resolution: usize,
) -> f64 {
    let resolution = resolution.max(2);
    let extent = Extent::of(box1.vertices().iter().chain(box2.vertices()).copied());
    let xs = Array1::linspace(extent.min_x, extent.max_x, resolution);
    let ys = Array1::linspace(extent.min_y, extent.max_y, resolution);

    let polygon1 = box1.to_polygon(0.0);
    let polygon2 = box2.to_polygon(0.0);
    let samples = Array2::from_shape_fn((resolution, resolution), |(row, col)| {
        let coord = Coord {
            x: xs[col],
            y: ys[row],
        };
        (polygon1.contains(&coord), polygon2.contains(&coord))
    });

    let intersection = samples.iter().filter(|(a, b)| *a && *b).count();
    let union = samples.iter().filter(|(a, b)| *a || *b).count();

    if union > 0 {
        intersection as f64 / union as f64
    } else {
        0.0
    }
}

/// Exact area shared by the two box outlines.
pub fn intersection_area(box1: &BoundingBox, box2: &BoundingBox) -> f64 {
    box1.to_polygon(0.0)
        .intersection(&box2.to_polygon(0.0), CLIPPER_FACTOR)
        .unsigned_area()
}

/// Fraction of `inner`'s polygon area that lies inside `outer`, or 0 for a
/// degenerate `inner`.
pub fn containment_ratio(inner: &BoundingBox, outer: &BoundingBox) -> f64 {
    let own_area = inner.to_polygon(0.0).unsigned_area();
    if own_area > 0.0 {
        intersection_area(inner, outer) / own_area
    } else {
        0.0
    }
}
