//! The four geometric shapes, stored in local ENU coordinates

use crate::{Datum, Enu, Wgs};

/// A single point in the local frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build a point by projecting a geographic coordinate into the frame of `datum`
    pub fn from_wgs(wgs: Wgs, datum: &Datum) -> Self {
        let enu = wgs.to_enu(datum);
        Self {
            x: enu.x,
            y: enu.y,
            z: enu.z,
        }
    }

    /// Re-express this point in geographic coordinates relative to `datum`
    pub fn to_wgs(&self, datum: &Datum) -> Wgs {
        Enu::new(self.x, self.y, self.z).to_wgs(datum)
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A directed segment between exactly two points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// An open polyline of ordered points
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the segment lengths along the polyline
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }
}

/// A polygon bounded by one exterior ring of ordered points
///
/// The ring may be stored open or closed; area and perimeter treat the last
/// point as connected back to the first either way. Interior rings (holes) are
/// not supported.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of stored ring vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Planar area of the exterior ring (shoelace formula), in square meters
    pub fn area(&self) -> f64 {
        let ring = self.closed_ring();
        if ring.len() < 4 {
            return 0.0;
        }
        let twice: f64 = ring
            .windows(2)
            .map(|pair| pair[0].x * pair[1].y - pair[1].x * pair[0].y)
            .sum();
        (twice / 2.0).abs()
    }

    /// Length of the exterior ring, in meters
    pub fn perimeter(&self) -> f64 {
        self.closed_ring()
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }

    fn closed_ring(&self) -> Vec<Point> {
        let mut ring = self.points.clone();
        match (ring.first(), ring.last()) {
            (Some(first), Some(last)) if first != last => ring.push(*first),
            _ => {}
        }
        ring
    }
}
