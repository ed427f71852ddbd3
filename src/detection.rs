use geo::Coord;
use serde::Deserialize;
use tracing::instrument;

use crate::{BoundingBox, TextAnnotation};

/// A text detection as delivered by the OCR service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDetection {
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "boundingPoly")]
    pub bounding_poly: RawPoly,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPoly {
    #[serde(default)]
    pub vertices: Vec<RawVertex>,
}

/// A vertex whose coordinates may be absent; the OCR service omits zeroes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawVertex {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl RawVertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

impl RawDetection {
    pub fn new(
        description: impl Into<String>,
        vertices: impl IntoIterator<Item = RawVertex>,
    ) -> Self {
        Self {
            description: description.into(),
            bounding_poly: RawPoly {
                vertices: vertices.into_iter().collect(),
            },
        }
    }
}

/// The body of an OCR text detection response, either a bare list of
/// detections or an object holding them under `textAnnotations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OcrResponse {
    List(Vec<RawDetection>),
    Annotated {
        #[serde(default, rename = "textAnnotations", alias = "text_annotations")]
        text_annotations: Vec<RawDetection>,
    },
}

impl OcrResponse {
    pub fn into_detections(self) -> Vec<RawDetection> {
        match self {
            OcrResponse::List(detections) => detections,
            OcrResponse::Annotated { text_annotations } => text_annotations,
        }
    }
}

/// Converts raw detections into annotations.
///
/// With `skip_full_text` the first detection, the service's summary of all
/// text in the image, is dropped. Detections without exactly four finite
/// vertices or without any text are dropped as well.
#[instrument(level = "debug", skip(raw), fields(count = raw.len()))]
pub fn annotations_from_detections(
    raw: &[RawDetection],
    skip_full_text: bool,
) -> Vec<TextAnnotation> {
    let skip = usize::from(skip_full_text);
    raw.iter()
        .enumerate()
        .skip(skip)
        .filter_map(|(index, detection)| {
            if detection.description.trim().is_empty() {
                log::debug!("Dropping detection {index}: empty description");
                return None;
            }
            let vertices = detection.bounding_poly.vertices.iter().map(|it| Coord {
                x: it.x.unwrap_or(0.0),
                y: it.y.unwrap_or(0.0),
            });
            match BoundingBox::new(vertices) {
                Ok(bounding_poly) => Some(TextAnnotation {
                    description: detection.description.clone(),
                    bounding_poly,
                }),
                Err(err) => {
                    log::debug!(
                        "Dropping detection {index} ('{}'): {err}",
                        detection.description
                    );
                    None
                }
            }
        })
        .collect()
}
