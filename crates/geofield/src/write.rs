//! Encoding the in-memory model back to GeoJSON and writing it to disk

use std::fs;

use serde_json::{Map, Value, json};
use tangent_frame::{Datum, Point};

use crate::{Crs, Feature, FeatureCollection, GeoError, Geometry, Result};

fn point_coordinates(point: &Point, datum: &Datum, crs: Crs) -> Value {
    match crs {
        Crs::Enu => json!([point.x, point.y, point.z]),
        Crs::Wgs => {
            let wgs = point.to_wgs(datum);
            json!([wgs.lon, wgs.lat, wgs.alt])
        }
    }
}

/// Encode one geometry variant as its GeoJSON object
///
/// Exact inverse of the decoder's dispatch: `Line` and `Path` both serialize
/// as `LineString`, `Polygon` as a single-ring `Polygon`.
pub(crate) fn geometry_to_json(geometry: &Geometry, datum: &Datum, crs: Crs) -> Value {
    match geometry {
        Geometry::Point(point) => json!({
            "type": "Point",
            "coordinates": point_coordinates(point, datum, crs),
        }),
        Geometry::Line(line) => json!({
            "type": "LineString",
            "coordinates": [
                point_coordinates(&line.start, datum, crs),
                point_coordinates(&line.end, datum, crs),
            ],
        }),
        Geometry::Path(path) => {
            let coords: Vec<Value> = path
                .points()
                .iter()
                .map(|p| point_coordinates(p, datum, crs))
                .collect();
            json!({ "type": "LineString", "coordinates": coords })
        }
        Geometry::Polygon(polygon) => {
            let ring: Vec<Value> = polygon
                .points()
                .iter()
                .map(|p| point_coordinates(p, datum, crs))
                .collect();
            json!({ "type": "Polygon", "coordinates": [ring] })
        }
    }
}

fn feature_to_json(feature: &Feature, datum: &Datum, crs: Crs) -> Value {
    let mut properties = Map::new();
    for (key, value) in &feature.properties {
        properties.insert(key.clone(), Value::String(value.clone()));
    }
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": geometry_to_json(&feature.geometry, datum, crs),
    })
}

/// Encode a collection as a GeoJSON tree in the requested coordinate flavor
///
/// The top-level properties always carry the canonical `crs` string, the
/// `[lat, lon, alt]` datum, and the yaw heading scalar (pitch and roll are
/// not persisted).
pub fn to_json(fc: &FeatureCollection, crs: Crs) -> Value {
    let features: Vec<Value> = fc
        .features
        .iter()
        .map(|feature| feature_to_json(feature, &fc.datum, crs))
        .collect();

    json!({
        "type": "FeatureCollection",
        "properties": {
            "crs": crs.canonical(),
            "datum": [fc.datum.lat, fc.datum.lon, fc.datum.alt],
            "heading": fc.heading.yaw,
        },
        "features": features,
    })
}

/// Serialize a collection to `path` in an explicit coordinate flavor
///
/// Output is pretty-printed with 2-space indentation and a trailing newline
/// so fixtures diff cleanly.
pub fn write_as(
    fc: &FeatureCollection,
    path: impl AsRef<std::path::Path>,
    crs: Crs,
) -> Result<()> {
    let path = path.as_ref();
    let mut text = serde_json::to_string_pretty(&to_json(fc, crs))?;
    text.push('\n');
    fs::write(path, text).map_err(|source| GeoError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Serialize a collection to `path` in its stored coordinate flavor
pub fn write(fc: &FeatureCollection, path: impl AsRef<std::path::Path>) -> Result<()> {
    write_as(fc, path, fc.crs)
}
