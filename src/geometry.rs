use geo::{Coord, Polygon};
use ndarray::Array2;

use crate::{
    util::{to_geo_poly, Extent},
    BoundingBox, Point,
};

impl BoundingBox {
    pub fn center(&self) -> Point {
        let sum = self
            .vertices()
            .iter()
            .fold(Coord::zero(), |acc: Point, it| acc + *it);
        sum / 4.0
    }

    /// Rotation in radians, the direction of the edge from vertex 0 to vertex 1.
    pub fn angle(&self) -> f64 {
        let [first, second, ..] = self.vertices();
        (second.y - first.y).atan2(second.x - first.x)
    }

    /// `(width, height)` as the mean lengths of the two pairs of opposite edges.
    pub fn dimensions(&self) -> (f64, f64) {
        let vertices = self.vertices();
        let edges: [f64; 4] = std::array::from_fn(|i| {
            let delta = vertices[(i + 1) % 4] - vertices[i];
            delta.x.hypot(delta.y)
        });
        ((edges[0] + edges[2]) / 2.0, (edges[1] + edges[3]) / 2.0)
    }

    /// Rectangle-model area, `width * height`.
    ///
    /// Differs from the polygon area for quadrilaterals that are not true
    /// rectangles. Merge tie-breaks rely on this exact definition.
    pub fn area(&self) -> f64 {
        let (width, height) = self.dimensions();
        width * height
    }

    /// Converts the box into a closed polygon.
    ///
    /// A non-zero `expand_px` returns the axis-aligned extent of the vertices
    /// grown by that margin on every side instead of the rotated outline.
    pub fn to_polygon(&self, expand_px: f64) -> Polygon<f64> {
        if expand_px == 0.0 {
            return to_geo_poly(self.vertices());
        }
        let extent = Extent::of(self.vertices().iter().copied()).expand(expand_px);
        to_geo_poly(&extent.corners())
    }

    /// Vertices as a `(4, 2)` array of `[x, y]` rows.
    pub fn to_array(&self) -> Array2<f64> {
        let vertices = self.vertices();
        Array2::from_shape_fn((4, 2), |(row, col)| {
            let vertex = vertices[row];
            if col == 0 {
                vertex.x
            } else {
                vertex.y
            }
        })
    }
}
