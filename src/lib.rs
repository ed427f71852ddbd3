mod consolidate;
pub mod detection;
mod error;
mod geometry;
pub mod iou;
mod merge;
mod predicates;
mod result;
mod util;
pub mod visualize;

pub use consolidate::{
    clean_text_annotations, clean_text_annotations_with, Consolidation, MergePass, MergeStep,
};
pub use detection::{annotations_from_detections, OcrResponse, RawDetection, RawPoly, RawVertex};
pub use error::{Error, Result};
pub use iou::calculate_iou;
pub use merge::{description_rule, merge_boxes, merge_boxes_with, DescriptionRule};
pub use predicates::{
    boxes_overlap, boxes_overlap_with, boxes_vertically_aligned, boxes_vertically_aligned_with,
};
pub use result::*;

use tracing::instrument;

/// Thresholds used by the predicates and the merge operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Largest rotation difference, in degrees, for two boxes to merge.
    pub max_angle_difference: f64,
    /// Largest offset between centers across the text direction, as a
    /// fraction of the smaller box height, for overlapping fragments.
    pub max_center_offset_ratio: f64,
    /// Smallest shared vertical span, as a fraction of the smaller box
    /// height, for adjacent words.
    pub min_vertical_overlap_ratio: f64,
    /// Largest horizontal gap, as a fraction of the average box height,
    /// for adjacent words.
    pub max_gap_ratio: f64,
    pub containment_threshold: f64,
    pub iou_threshold: f64,
    /// Samples per axis of the IoU grid.
    pub iou_grid_resolution: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_angle_difference: 5.0,
            max_center_offset_ratio: 0.5,
            min_vertical_overlap_ratio: 0.5,
            max_gap_ratio: 0.5,
            containment_threshold: 0.95,
            iou_threshold: 0.5,
            iou_grid_resolution: 100,
        }
    }
}

pub struct ConsolidatorBuilder {
    options: MergeOptions,
    skip_full_text: bool,
}

impl ConsolidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_angle_difference(mut self, degrees: f64) -> Self {
        self.options.max_angle_difference = degrees;
        self
    }

    pub fn max_center_offset_ratio(mut self, ratio: f64) -> Self {
        self.options.max_center_offset_ratio = ratio;
        self
    }

    pub fn min_vertical_overlap_ratio(mut self, ratio: f64) -> Self {
        self.options.min_vertical_overlap_ratio = ratio;
        self
    }

    pub fn max_gap_ratio(mut self, ratio: f64) -> Self {
        self.options.max_gap_ratio = ratio;
        self
    }

    pub fn containment_threshold(mut self, threshold: f64) -> Self {
        self.options.containment_threshold = threshold;
        self
    }

    pub fn iou_threshold(mut self, threshold: f64) -> Self {
        self.options.iou_threshold = threshold;
        self
    }

    pub fn iou_grid_resolution(mut self, resolution: usize) -> Self {
        self.options.iou_grid_resolution = resolution;
        self
    }

    /// Whether the first raw detection is the whole-image summary and should
    /// be dropped.
    pub fn skip_full_text(mut self, skip: bool) -> Self {
        self.skip_full_text = skip;
        self
    }

    #[instrument(skip(self))]
    pub fn build(self) -> Consolidator {
        log::debug!("Building consolidator with {:?}", self.options);
        Consolidator {
            options: self.options,
            skip_full_text: self.skip_full_text,
        }
    }
}

impl Default for ConsolidatorBuilder {
    fn default() -> Self {
        Self {
            options: MergeOptions::default(),
            skip_full_text: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Consolidator {
    options: MergeOptions,
    skip_full_text: bool,
}

impl Consolidator {
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    #[instrument(skip_all, fields(count = annotations.len()))]
    pub fn clean(&self, annotations: Vec<TextAnnotation>) -> Vec<TextAnnotation> {
        consolidate::consolidate(annotations, &self.options, None)
    }

    pub fn clean_detections(&self, raw: &[RawDetection]) -> Vec<TextAnnotation> {
        self.clean(annotations_from_detections(raw, self.skip_full_text))
    }

    /// Same result as [`Consolidator::clean`], along with every merge made on
    /// the way.
    #[instrument(skip_all, fields(count = annotations.len()))]
    pub fn clean_traced(&self, annotations: Vec<TextAnnotation>) -> Consolidation {
        let mut steps = Vec::new();
        let annotations = consolidate::consolidate(annotations, &self.options, Some(&mut steps));
        Consolidation { annotations, steps }
    }

    pub fn clean_detections_traced(&self, raw: &[RawDetection]) -> Consolidation {
        self.clean_traced(annotations_from_detections(raw, self.skip_full_text))
    }
}

impl Default for Consolidator {
    fn default() -> Self {
        ConsolidatorBuilder::default().build()
    }
}
