use geo::Intersects;
use tracing::instrument;

use crate::{
    util::{angle_difference, Extent, Frame},
    BoundingBox, MergeOptions,
};

fn aligned(box1: &BoundingBox, box2: &BoundingBox, options: &MergeOptions) -> bool {
    let diff = angle_difference(box1.angle(), box2.angle());
    diff.to_degrees() <= options.max_angle_difference
}

/// Whether two boxes are fragments of one text run: aligned, centers on
/// the same line, and intersecting.
pub fn boxes_overlap(box1: &BoundingBox, box2: &BoundingBox) -> bool {
    boxes_overlap_with(box1, box2, &MergeOptions::default())
}

#[instrument(level = "trace", skip_all)]
pub fn boxes_overlap_with(
    box1: &BoundingBox,
    box2: &BoundingBox,
    options: &MergeOptions,
) -> bool {
    if !aligned(box1, box2, options) {
        log::trace!(
            "Overlap rejected: angles differ by more than {}°",
            options.max_angle_difference
        );
        return false;
    }

    let reference_angle = (box1.angle() + box2.angle()) / 2.0;
    let frame = Frame::new(box1.center(), reference_angle);
    let center_offset = frame.to_local(box2.center()).y.abs();

    let (_, height1) = box1.dimensions();
    let (_, height2) = box2.dimensions();
    let max_offset = height1.min(height2) * options.max_center_offset_ratio;
    if center_offset > max_offset {
        log::trace!("Overlap rejected: center offset {center_offset:.2} exceeds {max_offset:.2}");
        return false;
    }

    box1.to_polygon(0.0).intersects(&box2.to_polygon(0.0))
}

/// Whether two boxes are consecutive words on one line: aligned, sharing
/// most of their vertical span, and separated by a small horizontal gap.
pub fn boxes_vertically_aligned(box1: &BoundingBox, box2: &BoundingBox) -> bool {
    boxes_vertically_aligned_with(box1, box2, &MergeOptions::default())
}

#[instrument(level = "trace", skip_all)]
pub fn boxes_vertically_aligned_with(
    box1: &BoundingBox,
    box2: &BoundingBox,
    options: &MergeOptions,
) -> bool {
    if !aligned(box1, box2, options) {
        log::trace!(
            "Adjacency rejected: angles differ by more than {}°",
            options.max_angle_difference
        );
        return false;
    }

    let frame = Frame::new(box1.center(), box1.angle());
    let extent1 = Extent::of(box1.vertices().iter().map(|it| frame.to_local(*it)));
    let extent2 = Extent::of(box2.vertices().iter().map(|it| frame.to_local(*it)));

    let height1 = extent1.height();
    let height2 = extent2.height();
    let avg_height = (height1 + height2) / 2.0;

    let min_overlap = height1.min(height2) * options.min_vertical_overlap_ratio;
    let y_overlap = extent1.max_y.min(extent2.max_y) - extent1.min_y.max(extent2.min_y);
    if y_overlap < min_overlap {
        log::trace!("Adjacency rejected: vertical overlap {y_overlap:.2} below {min_overlap:.2}");
        return false;
    }

    let gap = if extent1.max_x < extent2.min_x {
        extent2.min_x - extent1.max_x
    } else if extent2.max_x < extent1.min_x {
        extent1.min_x - extent2.max_x
    } else {
        0.0
    };

    gap < avg_height * options.max_gap_ratio
}
