use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::{util::Extent, BoundingBox, MergeStep, TextAnnotation};

pub const UNTOUCHED: Rgb<u8> = Rgb([255, 0, 0]);
pub const MERGE_INPUT: Rgb<u8> = Rgb([0, 0, 255]);
pub const MERGE_RESULT: Rgb<u8> = Rgb([255, 255, 0]);

pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width.max(1), height.max(1), Rgb([255, 255, 255]))
}

/// Canvas size that fits every box plus `margin` pixels.
pub fn canvas_size<'a>(
    annotations: impl IntoIterator<Item = &'a TextAnnotation>,
    margin: u32,
) -> (u32, u32) {
    let extent = Extent::of(
        annotations
            .into_iter()
            .flat_map(|it| it.bounding_poly.vertices().iter().copied()),
    );
    if !extent.max_x.is_finite() || !extent.max_y.is_finite() {
        return (margin.max(1), margin.max(1));
    }
    let width = extent.max_x.max(0.0).ceil() as u32 + margin;
    let height = extent.max_y.max(0.0).ceil() as u32 + margin;
    (width, height)
}

/// Draws the outline of `bbox`, `thickness` pixels wide.
pub fn draw_bounding_box(
    canvas: &mut RgbImage,
    bbox: &BoundingBox,
    color: Rgb<u8>,
    thickness: u32,
) {
    let radius = (thickness.max(1) / 2) as i32;
    let vertices = bbox.vertices();
    for i in 0..4 {
        let start = vertices[i];
        let end = vertices[(i + 1) % 4];
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                draw_line_segment_mut(
                    canvas,
                    ((start.x + dx as f64) as f32, (start.y + dy as f64) as f32),
                    ((end.x + dx as f64) as f32, (end.y + dy as f64) as f32),
                    color,
                );
            }
        }
    }
}

pub fn render_annotations(canvas: &mut RgbImage, annotations: &[TextAnnotation]) {
    for annotation in annotations {
        draw_bounding_box(canvas, &annotation.bounding_poly, UNTOUCHED, 2);
    }
}

/// Draws a merge: untouched boxes in red, both inputs in blue and the
/// merged box in yellow on top.
pub fn render_merge_step(canvas: &mut RgbImage, step: &MergeStep) {
    render_annotations(canvas, &step.remaining);
    draw_bounding_box(canvas, &step.first.bounding_poly, MERGE_INPUT, 3);
    draw_bounding_box(canvas, &step.second.bounding_poly, MERGE_INPUT, 3);
    draw_bounding_box(canvas, &step.merged.bounding_poly, MERGE_RESULT, 4);
}
