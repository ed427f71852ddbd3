use boxmerge::{
    visualize::{
        blank_canvas, canvas_size, draw_bounding_box, render_merge_step, MERGE_INPUT,
        MERGE_RESULT, UNTOUCHED,
    },
    BoundingBox, ConsolidatorBuilder, TextAnnotation,
};
use image::Rgb;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn annotation(text: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> TextAnnotation {
    TextAnnotation::new(
        text,
        BoundingBox::from_corners(min_x, min_y, max_x, max_y).unwrap(),
    )
}

#[test]
fn draws_outline_only() {
    let mut canvas = blank_canvas(100, 100);
    let bbox = BoundingBox::from_corners(10.0, 10.0, 60.0, 40.0).unwrap();
    draw_bounding_box(&mut canvas, &bbox, UNTOUCHED, 1);

    assert_eq!(*canvas.get_pixel(35, 10), UNTOUCHED);
    assert_eq!(*canvas.get_pixel(60, 25), UNTOUCHED);
    assert_eq!(*canvas.get_pixel(35, 25), WHITE);
}

#[test]
fn merge_step_colors() {
    let consolidation = ConsolidatorBuilder::new().build().clean_traced(vec![
        annotation("Hello", 10.0, 10.0, 60.0, 40.0),
        annotation("World", 70.0, 10.0, 120.0, 40.0),
        annotation("Elsewhere", 10.0, 100.0, 90.0, 130.0),
    ]);
    assert_eq!(consolidation.steps.len(), 1);

    let (width, height) = canvas_size(&consolidation.annotations, 20);
    assert_eq!((width, height), (140, 150));

    let mut canvas = blank_canvas(width, height);
    render_merge_step(&mut canvas, &consolidation.steps[0]);
    assert_eq!(*canvas.get_pixel(35, 100), UNTOUCHED);
    assert_eq!(*canvas.get_pixel(70, 25), MERGE_INPUT);
    assert_eq!(*canvas.get_pixel(90, 10), MERGE_RESULT);
    assert_eq!(*canvas.get_pixel(90, 25), WHITE);
}
