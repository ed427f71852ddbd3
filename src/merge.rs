use tracing::instrument;

use crate::{
    iou::{calculate_iou_with_resolution, containment_ratio},
    util::{Extent, Frame},
    BoundingBox, MergeOptions, TextAnnotation,
};

/// Which rule picked the merged description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionRule {
    /// One box lies almost entirely inside the other; the larger box wins.
    Containment,
    /// Both boxes cover mostly the same region; the longer text wins.
    SameRegion,
    /// The boxes sit next to each other; texts are joined in reading order.
    SideBySide,
}

/// Merges two annotations into one, keeping the orientation of the larger box.
pub fn merge_boxes(ann1: &TextAnnotation, ann2: &TextAnnotation) -> TextAnnotation {
    merge_boxes_with(ann1, ann2, &MergeOptions::default())
}

#[instrument(level = "debug", skip_all)]
pub fn merge_boxes_with(
    ann1: &TextAnnotation,
    ann2: &TextAnnotation,
    options: &MergeOptions,
) -> TextAnnotation {
    let box1 = &ann1.bounding_poly;
    let box2 = &ann2.bounding_poly;
    let box1_area = box1.area();
    let box2_area = box2.area();

    let (rule, iou) = description_rule(box1, box2, options);
    let description = match rule {
        DescriptionRule::Containment => {
            if box1_area >= box2_area {
                ann1.description.clone()
            } else {
                ann2.description.clone()
            }
        }
        DescriptionRule::SameRegion => {
            if ann1.description.chars().count() >= ann2.description.chars().count() {
                ann1.description.clone()
            } else {
                ann2.description.clone()
            }
        }
        DescriptionRule::SideBySide => {
            if box1.center().x <= box2.center().x {
                format!("{} {}", ann1.description, ann2.description)
            } else {
                format!("{} {}", ann2.description, ann1.description)
            }
        }
    };

    log::debug!(
        "Merging '{}' (area {box1_area:.2}) with '{}' (area {box2_area:.2}), \
         IoU {iou:.3}, {rule:?} -> '{description}'",
        ann1.description,
        ann2.description,
    );

    let merged_angle = if box1_area >= box2_area {
        box1.angle()
    } else {
        box2.angle()
    };

    TextAnnotation {
        description,
        bounding_poly: merged_bounds(box1, box2, merged_angle),
    }
}

/// Picks the description rule for two boxes, returning it with their grid IoU.
pub fn description_rule(
    box1: &BoundingBox,
    box2: &BoundingBox,
    options: &MergeOptions,
) -> (DescriptionRule, f64) {
    let iou = calculate_iou_with_resolution(box1, box2, options.iou_grid_resolution);
    let contained = containment_ratio(box1, box2) > options.containment_threshold
        || containment_ratio(box2, box1) > options.containment_threshold;
    if contained {
        (DescriptionRule::Containment, iou)
    } else if iou > options.iou_threshold {
        (DescriptionRule::SameRegion, iou)
    } else {
        (DescriptionRule::SideBySide, iou)
    }
}

/// Tightest box at `angle` around both inputs, anchored at `box1`'s center.
fn merged_bounds(box1: &BoundingBox, box2: &BoundingBox, angle: f64) -> BoundingBox {
    let frame = Frame::new(box1.center(), angle);
    let extent = Extent::of(
        box1.vertices()
            .iter()
            .chain(box2.vertices())
            .map(|it| frame.to_local(*it)),
    );
    BoundingBox::from_vertices(extent.corners().map(|it| frame.to_world(it)))
}
