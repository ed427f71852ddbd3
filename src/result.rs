use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point in image pixel space, y growing downward.
pub type Point = Coord<f64>;

/// A rotated rectangle given as four clockwise vertices.
///
/// The first edge (vertex 0 to vertex 1) defines the box's rotation, so the
/// vertex order is significant and never normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vertices", into = "Vertices")]
pub struct BoundingBox {
    vertices: [Point; 4],
}

impl BoundingBox {
    pub fn new(vertices: impl IntoIterator<Item = Point>) -> Result<Self> {
        let vertices = vertices.into_iter().collect::<Vec<_>>();
        let found = vertices.len();
        let vertices: [Point; 4] = vertices
            .try_into()
            .map_err(|_| Error::InvalidVertexCount { found })?;
        if let Some(index) = vertices
            .iter()
            .position(|it| !it.x.is_finite() || !it.y.is_finite())
        {
            return Err(Error::NonFiniteVertex { index });
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned box spanning `(min_x, min_y)` to `(max_x, max_y)`,
    /// starting at the top-left corner.
    pub fn from_corners(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        Self::new([
            Coord { x: min_x, y: min_y },
            Coord { x: max_x, y: min_y },
            Coord { x: max_x, y: max_y },
            Coord { x: min_x, y: max_y },
        ])
    }

    /// Skips validation; callers guarantee finite coordinates.
    pub(crate) fn from_vertices(vertices: [Point; 4]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point; 4] {
        &self.vertices
    }
}

impl TryFrom<Vec<Point>> for BoundingBox {
    type Error = Error;

    fn try_from(vertices: Vec<Point>) -> Result<Self> {
        Self::new(vertices)
    }
}

#[derive(Serialize, Deserialize)]
struct Vertices {
    vertices: Vec<Point>,
}

impl TryFrom<Vertices> for BoundingBox {
    type Error = Error;

    fn try_from(value: Vertices) -> Result<Self> {
        Self::new(value.vertices)
    }
}

impl From<BoundingBox> for Vertices {
    fn from(value: BoundingBox) -> Self {
        Self {
            vertices: value.vertices.to_vec(),
        }
    }
}

/// Recognized text paired with the box it was found in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    pub description: String,
    pub bounding_poly: BoundingBox,
}

impl TextAnnotation {
    pub fn new(description: impl Into<String>, bounding_poly: BoundingBox) -> Self {
        Self {
            description: description.into(),
            bounding_poly,
        }
    }
}
