use boxmerge::{
    annotations_from_detections, clean_text_annotations, BoundingBox, ConsolidatorBuilder,
    MergePass, OcrResponse, RawDetection, RawVertex, TextAnnotation,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn annotation(text: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> TextAnnotation {
    TextAnnotation::new(
        text,
        BoundingBox::from_corners(min_x, min_y, max_x, max_y).unwrap(),
    )
}

fn descriptions(annotations: &[TextAnnotation]) -> Vec<&str> {
    annotations.iter().map(|it| it.description.as_str()).collect()
}

/// Two lines of text as an OCR engine might split them, including a
/// duplicated detection of the first word.
fn two_lines() -> Vec<TextAnnotation> {
    vec![
        annotation("Hello", 0.0, 0.0, 50.0, 30.0),
        annotation("World", 55.0, 0.0, 100.0, 30.0),
        annotation("Hello", 2.0, 1.0, 52.0, 31.0),
        annotation("Second", 0.0, 100.0, 80.0, 130.0),
        annotation("line", 85.0, 100.0, 130.0, 130.0),
    ]
}

#[test]
fn adjacent_fragments_become_one() {
    init();
    let cleaned = clean_text_annotations(vec![
        annotation("Hello", 0.0, 0.0, 50.0, 30.0),
        annotation("World", 55.0, 0.0, 100.0, 30.0),
    ]);
    assert_eq!(cleaned.len(), 1);
    assert!(cleaned[0].description.contains("Hello"));
    assert!(cleaned[0].description.contains("World"));
}

#[test]
fn separate_lines_stay_separate() {
    let input = vec![
        annotation("Top", 0.0, 0.0, 50.0, 30.0),
        annotation("Bottom", 0.0, 200.0, 50.0, 230.0),
    ];
    let cleaned = clean_text_annotations(input.clone());
    assert_eq!(cleaned, input);
}

#[test]
fn empty_input() {
    assert!(clean_text_annotations(Vec::new()).is_empty());
}

#[test]
fn duplicates_then_words_are_merged() {
    init();
    let cleaned = clean_text_annotations(two_lines());
    assert_eq!(descriptions(&cleaned), ["Hello World", "Second line"]);
}

#[test]
fn cleaning_is_idempotent() {
    let inputs = [
        two_lines(),
        vec![
            annotation("a", 0.0, 0.0, 30.0, 30.0),
            annotation("b", 35.0, 0.0, 65.0, 30.0),
            annotation("c", 70.0, 0.0, 100.0, 30.0),
        ],
        vec![
            annotation("Top", 0.0, 0.0, 50.0, 30.0),
            annotation("Bottom", 0.0, 200.0, 50.0, 230.0),
        ],
    ];
    for input in inputs {
        let once = clean_text_annotations(input);
        let twice = clean_text_annotations(once.clone());
        assert_eq!(once, twice);
    }
}

#[test]
fn merged_annotations_move_to_the_end() {
    let cleaned = clean_text_annotations(vec![
        annotation("Hello", 0.0, 0.0, 50.0, 30.0),
        annotation("World", 55.0, 0.0, 100.0, 30.0),
        annotation("Elsewhere", 0.0, 300.0, 90.0, 330.0),
    ]);
    assert_eq!(descriptions(&cleaned), ["Elsewhere", "Hello World"]);
}

#[test]
fn words_chain_along_a_line() {
    let cleaned = clean_text_annotations(vec![
        annotation("a", 0.0, 0.0, 30.0, 30.0),
        annotation("b", 35.0, 0.0, 65.0, 30.0),
        annotation("c", 70.0, 0.0, 100.0, 30.0),
    ]);
    assert_eq!(descriptions(&cleaned), ["a b c"]);
    let [top_left, .., bottom_right, _] = *cleaned[0].bounding_poly.vertices();
    assert!(top_left.x.abs() < 1e-9 && top_left.y.abs() < 1e-9);
    assert!((bottom_right.x - 100.0).abs() < 1e-9 && (bottom_right.y - 30.0).abs() < 1e-9);
}

#[test]
fn tracing_does_not_change_result() {
    init();
    let consolidator = ConsolidatorBuilder::new().build();
    let traced = consolidator.clean_traced(two_lines());
    assert_eq!(traced.annotations, consolidator.clean(two_lines()));

    let passes = traced.steps.iter().map(|it| it.pass).collect::<Vec<_>>();
    assert_eq!(
        passes,
        [MergePass::Overlap, MergePass::Adjacency, MergePass::Adjacency]
    );

    let first = &traced.steps[0];
    assert_eq!(first.first.description, "Hello");
    assert_eq!(first.second.description, "Hello");
    assert_eq!(descriptions(&first.remaining), ["World", "Second", "line"]);
}

#[test]
fn builder_overrides_thresholds() {
    let input = vec![
        annotation("Hello", 0.0, 0.0, 50.0, 30.0),
        annotation("World", 55.0, 0.0, 100.0, 30.0),
    ];
    let tight = ConsolidatorBuilder::new().max_gap_ratio(0.1).build();
    assert_eq!(tight.options().max_gap_ratio, 0.1);
    assert_eq!(tight.clean(input.clone()).len(), 2);

    let default = ConsolidatorBuilder::default().build();
    assert_eq!(default.clean(input).len(), 1);
}

fn square(x: f64, y: f64, size: f64) -> Vec<RawVertex> {
    vec![
        RawVertex::new(x, y),
        RawVertex::new(x + size, y),
        RawVertex::new(x + size, y + size),
        RawVertex::new(x, y + size),
    ]
}

#[test]
fn detections_are_filtered() {
    init();
    let raw = vec![
        RawDetection::new("Hello World", square(0.0, 0.0, 100.0)),
        RawDetection::new("Hello", square(0.0, 0.0, 30.0)),
        RawDetection::new("broken", square(0.0, 0.0, 30.0).into_iter().take(3)),
        RawDetection::new("  ", square(200.0, 0.0, 30.0)),
        RawDetection::new("World", square(300.0, 0.0, 30.0)),
    ];

    let annotations = annotations_from_detections(&raw, true);
    assert_eq!(descriptions(&annotations), ["Hello", "World"]);

    let annotations = annotations_from_detections(&raw, false);
    assert_eq!(descriptions(&annotations), ["Hello World", "Hello", "World"]);
}

#[test]
fn detections_parse_from_ocr_json() {
    let json = r#"{
        "textAnnotations": [
            {
                "description": "こんにちは 世界",
                "boundingPoly": { "vertices": [{}, {"x": 200}, {"x": 200, "y": 30}, {"y": 30}] }
            },
            {
                "description": "こんにちは",
                "boundingPoly": { "vertices": [{}, {"x": 100}, {"x": 100, "y": 30}, {"y": 30}] }
            },
            {
                "description": "世界",
                "boundingPoly": { "vertices": [{"x": 110}, {"x": 200}, {"x": 200, "y": 30}, {"x": 110, "y": 30}] }
            }
        ]
    }"#;
    let detections = serde_json::from_str::<OcrResponse>(json)
        .unwrap()
        .into_detections();
    assert_eq!(detections.len(), 3);
    assert_eq!(detections[0].bounding_poly.vertices[0], RawVertex::default());

    let consolidator = ConsolidatorBuilder::new().build();
    let cleaned = consolidator.clean_detections(&detections);
    assert_eq!(descriptions(&cleaned), ["こんにちは 世界"]);
    assert_eq!(cleaned[0].bounding_poly.vertices()[0].x, 0.0);
}

#[test]
fn detections_parse_from_bare_list() {
    let json = r#"[
        {"description": "a", "bounding_poly": {"vertices": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}, {"x": 0, "y": 10}]}}
    ]"#;
    let detections = serde_json::from_str::<OcrResponse>(json)
        .unwrap()
        .into_detections();
    let consolidator = ConsolidatorBuilder::new().skip_full_text(false).build();
    assert_eq!(descriptions(&consolidator.clean_detections(&detections)), ["a"]);
}

#[test]
fn output_serializes_vertices() {
    let cleaned = clean_text_annotations(vec![annotation("a", 0.0, 0.0, 10.0, 10.0)]);
    let json = serde_json::to_value(&cleaned).unwrap();
    assert_eq!(json[0]["description"], "a");
    assert_eq!(json[0]["bounding_poly"]["vertices"][2]["x"], 10.0);
    assert_eq!(json[0]["bounding_poly"]["vertices"].as_array().unwrap().len(), 4);
}
