use geo::{Coord, LineString, Polygon};
use nalgebra::{Point2, Rotation2};

use crate::Point;

/// A translated and rotated coordinate system.
///
/// `to_local` moves `origin` to (0, 0) and rotates by `-angle`, so an edge at
/// `angle` in image space becomes horizontal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    origin: Point,
    rotation: Rotation2<f64>,
}

impl Frame {
    pub(crate) fn new(origin: Point, angle: f64) -> Self {
        Self {
            origin,
            rotation: Rotation2::new(-angle),
        }
    }

    pub(crate) fn to_local(&self, point: Point) -> Point {
        let local = self.rotation * Point2::new(point.x - self.origin.x, point.y - self.origin.y);
        Coord {
            x: local.x,
            y: local.y,
        }
    }

    pub(crate) fn to_world(&self, point: Point) -> Point {
        let world = self.rotation.inverse_transform_point(&Point2::new(point.x, point.y));
        Coord {
            x: world.x + self.origin.x,
            y: world.y + self.origin.y,
        }
    }
}

/// Axis-aligned min/max of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub(crate) fn of(points: impl IntoIterator<Item = Point>) -> Self {
        points.into_iter().fold(
            Self {
                min_x: f64::INFINITY,
                min_y: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |acc, point| Self {
                min_x: acc.min_x.min(point.x),
                min_y: acc.min_y.min(point.y),
                max_x: acc.max_x.max(point.x),
                max_y: acc.max_y.max(point.y),
            },
        )
    }

    pub(crate) fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub(crate) fn expand(self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Corners clockwise from the top-left.
    pub(crate) fn corners(&self) -> [Point; 4] {
        [
            Coord {
                x: self.min_x,
                y: self.min_y,
            },
            Coord {
                x: self.max_x,
                y: self.min_y,
            },
            Coord {
                x: self.max_x,
                y: self.max_y,
            },
            Coord {
                x: self.min_x,
                y: self.max_y,
            },
        ]
    }
}

pub(crate) fn to_geo_poly(points: &[Point]) -> Polygon<f64> {
    Polygon::new(LineString::new(points.to_vec()), vec![])
}

/// Smallest absolute difference between two angles, in [0, pi].
pub(crate) fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(2.0 * std::f64::consts::PI - diff)
}
