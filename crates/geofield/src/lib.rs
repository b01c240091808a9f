//! Geofield - GeoJSON Codec for Local-Frame Field Data
//!
//! This library converts between GeoJSON documents on disk and an in-memory
//! collection of geometric features anchored to a local tangent-plane (ENU)
//! frame. Survey and field-boundary data expressed in WGS84 longitude/latitude
//! is loaded into flat, metric, Cartesian coordinates centered at a document
//! datum, and can be written back out in either coordinate flavor.
//!
//! # Architecture
//!
//! - **[`FeatureCollection`] / [`Feature`] / [`Geometry`]**: the in-memory model;
//!   every point is stored in the local frame regardless of input flavor
//! - **[`read`]**: normalize any legal GeoJSON root shape, resolve the header
//!   (`crs`, `datum`, `heading`), and decode all features
//! - **[`write`] / [`write_as`]**: re-encode the model as spec-compliant GeoJSON
//!   in the stored or an explicitly chosen coordinate flavor
//! - **[`Vector`]**: a convenience layer treating one polygon as a field
//!   boundary and the remaining features as typed annotation elements
//!
//! The coordinate math lives in the `tangent-frame` crate; JSON handling is
//! built on `serde_json`.

mod model;
mod parse;
mod vector;
mod write;

// Public API exports
pub use model::{Crs, Feature, FeatureCollection, Geometry};
pub use parse::{from_json, parse_crs, parse_geometry, parse_properties, read};
pub use vector::{Element, Vector};
pub use write::{to_json, write, write_as};

/// Error types for the codec
///
/// Messages for header and CRS defects are stable strings; callers pattern
/// match on them and the test suite checks them verbatim.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level object has no string 'type' field")]
    MalformedDocument,

    #[error("missing top-level 'properties'")]
    MissingProperties,

    #[error("'properties' missing string 'crs'")]
    MissingCrs,

    #[error("Unknown CRS string: {0}")]
    InvalidCrs(String),

    #[error("'properties' missing array 'datum' of ≥3 numbers")]
    MissingDatum,

    #[error("'properties' missing numeric 'heading'")]
    MissingHeading,

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("cannot open {path} for reading: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot open {path} for writing: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("no features found in file")]
    EmptyCollection,

    #[error("no polygon found to use as field boundary")]
    NoFieldBoundary,
}

pub type Result<T> = std::result::Result<T, GeoError>;
