use std::fmt;

use tracing::instrument;

use crate::{
    merge::merge_boxes_with,
    predicates::{boxes_overlap_with, boxes_vertically_aligned_with},
    BoundingBox, MergeOptions, TextAnnotation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePass {
    /// Fragments of one text run, see [`boxes_overlap`](crate::boxes_overlap).
    Overlap,
    /// Neighbouring words on one line, see
    /// [`boxes_vertically_aligned`](crate::boxes_vertically_aligned).
    Adjacency,
}

impl MergePass {
    fn matches(self, box1: &BoundingBox, box2: &BoundingBox, options: &MergeOptions) -> bool {
        match self {
            MergePass::Overlap => boxes_overlap_with(box1, box2, options),
            MergePass::Adjacency => boxes_vertically_aligned_with(box1, box2, options),
        }
    }
}

impl fmt::Display for MergePass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePass::Overlap => f.write_str("overlap"),
            MergePass::Adjacency => f.write_str("adjacency"),
        }
    }
}

/// One merge performed while consolidating.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStep {
    pub pass: MergePass,
    pub first: TextAnnotation,
    pub second: TextAnnotation,
    pub merged: TextAnnotation,
    /// Annotations untouched by this merge, in list order.
    pub remaining: Vec<TextAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Consolidation {
    pub annotations: Vec<TextAnnotation>,
    pub steps: Vec<MergeStep>,
}

/// Merges overlapping fragments, then joins adjacent words on each line.
pub fn clean_text_annotations(
    annotations: impl IntoIterator<Item = TextAnnotation>,
) -> Vec<TextAnnotation> {
    clean_text_annotations_with(annotations, &MergeOptions::default())
}

pub fn clean_text_annotations_with(
    annotations: impl IntoIterator<Item = TextAnnotation>,
    options: &MergeOptions,
) -> Vec<TextAnnotation> {
    consolidate(annotations.into_iter().collect(), options, None)
}

#[instrument(level = "debug", skip_all, fields(count = annotations.len()))]
pub(crate) fn consolidate(
    annotations: Vec<TextAnnotation>,
    options: &MergeOptions,
    mut steps: Option<&mut Vec<MergeStep>>,
) -> Vec<TextAnnotation> {
    let annotations = merge_with_criteria(
        annotations,
        MergePass::Overlap,
        options,
        steps.as_deref_mut(),
    );
    let annotations = merge_with_criteria(annotations, MergePass::Adjacency, options, steps);
    log::debug!("Consolidated into {} annotations", annotations.len());
    annotations
}

/// Repeatedly merges the first matching pair in `(i, j)` scan order until no
/// pair matches. The merged annotation replaces both inputs at the end of
/// the list, so the outcome depends on input order.
#[instrument(level = "debug", skip(annotations, options, steps), fields(count = annotations.len()))]
pub(crate) fn merge_with_criteria(
    mut annotations: Vec<TextAnnotation>,
    pass: MergePass,
    options: &MergeOptions,
    mut steps: Option<&mut Vec<MergeStep>>,
) -> Vec<TextAnnotation> {
    while let Some((i, j)) = first_match(&annotations, pass, options) {
        let second = annotations.remove(j);
        let first = annotations.remove(i);
        let merged = merge_boxes_with(&first, &second, options);
        log::trace!("{pass} pass merged indices {i} and {j}");

        if let Some(steps) = steps.as_deref_mut() {
            steps.push(MergeStep {
                pass,
                first,
                second,
                merged: merged.clone(),
                remaining: annotations.clone(),
            });
        }
        annotations.push(merged);
    }
    annotations
}

fn first_match(
    annotations: &[TextAnnotation],
    pass: MergePass,
    options: &MergeOptions,
) -> Option<(usize, usize)> {
    (0..annotations.len()).find_map(|i| {
        (i + 1..annotations.len())
            .find(|&j| {
                pass.matches(
                    &annotations[i].bounding_poly,
                    &annotations[j].bounding_poly,
                    options,
                )
            })
            .map(|j| (i, j))
    })
}
