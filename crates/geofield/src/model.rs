//! In-memory model: geometry variants, features, and the collection root

use std::collections::HashMap;
use std::fmt;

use tangent_frame::{Datum, Euler, Line, Path, Point, Polygon};

/// Coordinate flavor used when reading and writing a document
///
/// Input coordinates are interpreted according to this tag, and output
/// coordinates are re-expressed in it. Internal storage is always the local
/// frame, so the tag never affects the stored model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Geographic WGS84 longitude/latitude/altitude
    Wgs,
    /// Local East-North-Up Cartesian meters
    Enu,
}

impl Crs {
    /// Canonical string emitted in the top-level `crs` property
    pub fn canonical(&self) -> &'static str {
        match self {
            Crs::Wgs => "EPSG:4326",
            Crs::Enu => "ENU",
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Wgs => write!(f, "WGS"),
            Crs::Enu => write!(f, "ENU"),
        }
    }
}

/// Closed set of geometry variants a feature can carry
///
/// A GeoJSON `LineString` with exactly two coordinate tuples becomes a
/// [`Line`]; any other length becomes a [`Path`]. Polygons keep only their
/// exterior ring.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Path(Path),
    Polygon(Polygon),
}

impl Geometry {
    /// Upper-case tag naming the variant, used by the diagnostic summary
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "POINT",
            Geometry::Line(_) => "LINE",
            Geometry::Path(_) => "PATH",
            Geometry::Polygon(_) => "POLYGON",
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Geometry::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Geometry::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(p) => Some(p),
            _ => None,
        }
    }
}

/// One geometry plus its flat string property map
///
/// Non-string JSON property values are stored as their JSON text form. The
/// optional `id` is the JSON text of the source feature's `id` field; it is
/// advisory only and not re-emitted on write.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: HashMap<String, String>,
    pub id: Option<String>,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: HashMap<String, String>) -> Self {
        Self {
            geometry,
            properties,
            id: None,
        }
    }
}

/// The root aggregate produced by a decode and consumed by an encode
///
/// All point coordinates are stored in the local frame derived from `datum`
/// at parse time. Mutating `datum` afterwards does NOT re-project stored
/// points: a mutate-then-rewrite produces a shifted datum label with unchanged
/// point geometry. This is intentional; callers relying on datum edits to
/// shift geometry must re-project themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub crs: Crs,
    pub datum: Datum,
    pub heading: Euler,
    pub features: Vec<Feature>,
}

impl fmt::Display for FeatureCollection {
    /// One-line header followed by one line per feature, for human inspection
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "CRS: {} | DATUM: {}, {}, {} | HEADING: {} | FEATURES: {}",
            self.crs,
            self.datum.lat,
            self.datum.lon,
            self.datum.alt,
            self.heading.yaw,
            self.features.len()
        )?;
        for feature in &self.features {
            writeln!(
                f,
                "  {} PROPS:{}",
                feature.geometry.kind(),
                feature.properties.len()
            )?;
        }
        Ok(())
    }
}
