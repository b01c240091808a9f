//! Document normalization, header resolution, and geometry decoding

use std::collections::HashMap;
use std::fs;

use serde_json::{Value, json};
use tangent_frame::{Datum, Euler, Line, Path, Point, Polygon, Wgs};

use crate::{Crs, Feature, FeatureCollection, GeoError, Geometry, Result};

/// Rewrite any legal GeoJSON root shape into a canonical FeatureCollection
///
/// A bare geometry is wrapped into a single Feature with empty properties; a
/// single Feature becomes the sole element of a synthesized collection. An
/// existing FeatureCollection passes through unchanged.
fn normalize_document(root: Value) -> Result<Value> {
    let kind = root
        .as_object()
        .and_then(|obj| obj.get("type"))
        .and_then(Value::as_str)
        .ok_or(GeoError::MalformedDocument)?;

    Ok(match kind {
        "FeatureCollection" => root,
        "Feature" => json!({
            "type": "FeatureCollection",
            "features": [root],
        }),
        _ => json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": root,
                "properties": {},
            }],
        }),
    })
}

/// Map a `crs` string onto a coordinate flavor
///
/// The lookup is exact and case-sensitive; anything outside the fixed table
/// is rejected.
pub fn parse_crs(s: &str) -> Result<Crs> {
    match s {
        "EPSG:4326" | "WGS84" | "WGS" => Ok(Crs::Wgs),
        "ENU" | "ECEF" => Ok(Crs::Enu),
        other => Err(GeoError::InvalidCrs(other.to_string())),
    }
}

/// Validate and extract the document-level `crs`, `datum`, and `heading`
///
/// Any header defect aborts the parse before feature decoding starts.
fn resolve_header(doc: &Value) -> Result<(Crs, Datum, Euler)> {
    let props = doc
        .get("properties")
        .and_then(Value::as_object)
        .ok_or(GeoError::MissingProperties)?;

    let crs = parse_crs(
        props
            .get("crs")
            .and_then(Value::as_str)
            .ok_or(GeoError::MissingCrs)?,
    )?;

    let datum_values = props
        .get("datum")
        .and_then(Value::as_array)
        .filter(|arr| arr.len() >= 3)
        .ok_or(GeoError::MissingDatum)?;
    // Positional lat/lon/alt; elements beyond index 2 are ignored.
    let mut datum = [0.0_f64; 3];
    for (slot, value) in datum.iter_mut().zip(datum_values) {
        *slot = value.as_f64().ok_or(GeoError::MissingDatum)?;
    }

    let yaw = props
        .get("heading")
        .and_then(Value::as_f64)
        .ok_or(GeoError::MissingHeading)?;

    Ok((
        crs,
        Datum::new(datum[0], datum[1], datum[2]),
        Euler::yaw_only(yaw),
    ))
}

fn coordinate(coords: &Value, index: usize) -> Result<f64> {
    coords
        .get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| GeoError::InvalidCoordinates(format!("index {index} missing or non-numeric")))
}

/// Decode one coordinate tuple into a local-frame point
///
/// WGS flavor reads `[lon, lat]` or `[lon, lat, alt]` and projects through the
/// datum; ENU flavor reads `[x, y]` or `[x, y, z]` directly. A missing third
/// element defaults to 0.0.
fn parse_point(coords: &Value, crs: Crs, datum: &Datum) -> Result<Point> {
    let first = coordinate(coords, 0)?;
    let second = coordinate(coords, 1)?;
    let third = match coords.get(2) {
        Some(value) => value.as_f64().ok_or_else(|| {
            GeoError::InvalidCoordinates("index 2 missing or non-numeric".to_string())
        })?,
        None => 0.0,
    };

    Ok(match crs {
        Crs::Wgs => Point::from_wgs(Wgs::new(second, first, third), datum),
        Crs::Enu => Point::new(first, second, third),
    })
}

fn coordinate_array(coords: &Value) -> Result<&Vec<Value>> {
    coords
        .as_array()
        .ok_or_else(|| GeoError::InvalidCoordinates("'coordinates' is not an array".to_string()))
}

/// LineString rule: exactly two tuples become a `Line`, anything else a `Path`
fn parse_line_string(coords: &Value, crs: Crs, datum: &Datum) -> Result<Geometry> {
    let tuples = coordinate_array(coords)?;
    let mut points = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        points.push(parse_point(tuple, crs, datum)?);
    }
    Ok(if points.len() == 2 {
        Geometry::Line(Line::new(points[0], points[1]))
    } else {
        Geometry::Path(Path::new(points))
    })
}

/// Polygon rule: only the exterior ring (`coordinates[0]`) is decoded
fn parse_polygon(coords: &Value, crs: Crs, datum: &Datum) -> Result<Polygon> {
    let rings = coordinate_array(coords)?;
    let ring = rings
        .first()
        .ok_or_else(|| GeoError::InvalidCoordinates("polygon has no exterior ring".to_string()))?;
    if rings.len() > 1 {
        tracing::debug!(
            interior_rings = rings.len() - 1,
            "ignoring polygon interior rings"
        );
    }

    let tuples = coordinate_array(ring)?;
    let mut points = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        points.push(parse_point(tuple, crs, datum)?);
    }
    Ok(Polygon::new(points))
}

/// Recursively decode one GeoJSON geometry object into zero or more variants
///
/// Multi* and GeometryCollection types fan out to multiple variants in source
/// order. Unrecognized geometry types yield an empty result rather than an
/// error.
pub fn parse_geometry(geom: &Value, crs: Crs, datum: &Datum) -> Result<Vec<Geometry>> {
    let Some(kind) = geom.get("type").and_then(Value::as_str) else {
        tracing::warn!("dropping geometry object without a string 'type'");
        return Ok(Vec::new());
    };
    let coords = || {
        geom.get("coordinates").ok_or_else(|| {
            GeoError::InvalidCoordinates(format!("{kind} geometry has no 'coordinates'"))
        })
    };

    let mut out = Vec::new();
    match kind {
        "Point" => out.push(Geometry::Point(parse_point(coords()?, crs, datum)?)),
        "LineString" => out.push(parse_line_string(coords()?, crs, datum)?),
        "Polygon" => out.push(Geometry::Polygon(parse_polygon(coords()?, crs, datum)?)),
        "MultiPoint" => {
            for tuple in coordinate_array(coords()?)? {
                out.push(Geometry::Point(parse_point(tuple, crs, datum)?));
            }
        }
        "MultiLineString" => {
            for line in coordinate_array(coords()?)? {
                out.push(parse_line_string(line, crs, datum)?);
            }
        }
        "MultiPolygon" => {
            for polygon in coordinate_array(coords()?)? {
                out.push(Geometry::Polygon(parse_polygon(polygon, crs, datum)?));
            }
        }
        "GeometryCollection" => {
            let subs = geom
                .get("geometries")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for sub in subs {
                out.extend(parse_geometry(sub, crs, datum)?);
            }
        }
        other => {
            tracing::warn!(geometry_type = other, "dropping unsupported geometry type");
        }
    }
    Ok(out)
}

/// Flatten a JSON properties object into a string-to-string map
///
/// String values are copied verbatim; every other value is serialized to its
/// compact JSON text. This is lossy by design for non-string values.
pub fn parse_properties(props: &Value) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Some(obj) = props.as_object() {
        for (key, value) in obj {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            map.insert(key.clone(), text);
        }
    }
    map
}

/// Decode an already-parsed JSON tree into a [`FeatureCollection`]
///
/// Features with null or absent geometry are skipped. A feature whose
/// geometry fans out to N variants yields N features sharing one copy of its
/// properties.
pub fn from_json(root: Value) -> Result<FeatureCollection> {
    let doc = normalize_document(root)?;
    let (crs, datum, heading) = resolve_header(&doc)?;

    let raw_features = doc
        .get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut features = Vec::with_capacity(raw_features.len());
    for raw in raw_features {
        let geometry = raw.get("geometry").unwrap_or(&Value::Null);
        if geometry.is_null() {
            tracing::debug!("skipping feature with null geometry");
            continue;
        }

        let geometries = parse_geometry(geometry, crs, &datum)?;
        let properties = parse_properties(raw.get("properties").unwrap_or(&Value::Null));
        let id = raw.get("id").map(Value::to_string);

        for geometry in geometries {
            features.push(Feature {
                geometry,
                properties: properties.clone(),
                id: id.clone(),
            });
        }
    }

    Ok(FeatureCollection {
        crs,
        datum,
        heading,
        features,
    })
}

/// Read and decode a GeoJSON file
///
/// Accepts a FeatureCollection, a single Feature, or a bare geometry at the
/// root. The whole file is read and parsed before any validation runs.
pub fn read(path: impl AsRef<std::path::Path>) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| GeoError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let root: Value = serde_json::from_str(&text)?;
    from_json(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const DATUM: Datum = Datum {
        lat: 52.0,
        lon: 5.0,
        alt: 0.0,
    };

    fn header() -> Value {
        json!({
            "crs": "EPSG:4326",
            "datum": [52.0, 5.0, 0.0],
            "heading": 2.0,
        })
    }

    #[test]
    fn parse_crs_synonyms() {
        assert_eq!(parse_crs("EPSG:4326").unwrap(), Crs::Wgs);
        assert_eq!(parse_crs("WGS84").unwrap(), Crs::Wgs);
        assert_eq!(parse_crs("WGS").unwrap(), Crs::Wgs);
        assert_eq!(parse_crs("ENU").unwrap(), Crs::Enu);
        assert_eq!(parse_crs("ECEF").unwrap(), Crs::Enu);
    }

    #[test]
    fn parse_crs_is_case_sensitive() {
        for bad in ["epsg:4326", "wgs84", "enu", "UNKNOWN:12345", ""] {
            let err = parse_crs(bad).unwrap_err();
            assert_eq!(err.to_string(), format!("Unknown CRS string: {bad}"));
        }
    }

    #[test]
    fn point_with_two_coordinates_defaults_altitude() {
        let point = parse_point(&json!([5.1, 52.1]), Crs::Wgs, &DATUM).unwrap();
        let wgs = point.to_wgs(&DATUM);
        assert_abs_diff_eq!(wgs.lon, 5.1, epsilon = 1e-9);
        assert_abs_diff_eq!(wgs.lat, 52.1, epsilon = 1e-9);
        assert_abs_diff_eq!(wgs.alt, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn point_with_three_coordinates_keeps_altitude() {
        let point = parse_point(&json!([5.1, 52.1, 10.0]), Crs::Wgs, &DATUM).unwrap();
        assert_abs_diff_eq!(point.to_wgs(&DATUM).alt, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn enu_flavor_coordinates_are_stored_directly() {
        let point = parse_point(&json!([12.5, -3.0, 1.5]), Crs::Enu, &DATUM).unwrap();
        assert_eq!(point, Point::new(12.5, -3.0, 1.5));
    }

    #[test]
    fn short_or_non_numeric_coordinates_fail() {
        assert!(matches!(
            parse_point(&json!([5.1]), Crs::Wgs, &DATUM),
            Err(GeoError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            parse_point(&json!(["bad", 52.1]), Crs::Wgs, &DATUM),
            Err(GeoError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            parse_point(&json!([5.1, 52.1, "bad"]), Crs::Wgs, &DATUM),
            Err(GeoError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn line_string_with_two_points_is_a_line() {
        let geom = parse_line_string(
            &json!([[5.1, 52.1, 0.0], [5.2, 52.2, 0.0]]),
            Crs::Wgs,
            &DATUM,
        )
        .unwrap();
        assert!(matches!(geom, Geometry::Line(_)));
    }

    #[test]
    fn line_string_with_other_lengths_is_a_path() {
        let three = parse_line_string(
            &json!([[5.1, 52.1, 0.0], [5.2, 52.2, 0.0], [5.3, 52.3, 0.0]]),
            Crs::Wgs,
            &DATUM,
        )
        .unwrap();
        assert!(matches!(three, Geometry::Path(_)));

        // 0 or 1 tuples are malformed but not rejected at this layer
        let one = parse_line_string(&json!([[5.1, 52.1]]), Crs::Wgs, &DATUM).unwrap();
        assert!(matches!(one, Geometry::Path(ref p) if p.len() == 1));
    }

    #[test]
    fn polygon_keeps_exterior_ring_only() {
        let coords = json!([
            [[5.1, 52.1], [5.2, 52.1], [5.2, 52.2], [5.1, 52.2], [5.1, 52.1]],
            [[5.12, 52.12], [5.18, 52.12], [5.18, 52.18], [5.12, 52.12]],
        ]);
        let polygon = parse_polygon(&coords, Crs::Wgs, &DATUM).unwrap();
        assert_eq!(polygon.len(), 5);
    }

    #[test]
    fn polygon_without_rings_fails() {
        assert!(matches!(
            parse_polygon(&json!([]), Crs::Wgs, &DATUM),
            Err(GeoError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn multi_point_fans_out() {
        let geom = json!({
            "type": "MultiPoint",
            "coordinates": [[5.1, 52.1], [5.2, 52.2], [5.3, 52.3]],
        });
        let geometries = parse_geometry(&geom, Crs::Wgs, &DATUM).unwrap();
        assert_eq!(geometries.len(), 3);
        assert!(geometries.iter().all(|g| matches!(g, Geometry::Point(_))));
    }

    #[test]
    fn multi_line_string_applies_line_string_rule() {
        let geom = json!({
            "type": "MultiLineString",
            "coordinates": [
                [[5.1, 52.1], [5.2, 52.2]],
                [[5.1, 52.1], [5.2, 52.2], [5.3, 52.3]],
            ],
        });
        let geometries = parse_geometry(&geom, Crs::Wgs, &DATUM).unwrap();
        assert_eq!(geometries.len(), 2);
        assert!(matches!(geometries[0], Geometry::Line(_)));
        assert!(matches!(geometries[1], Geometry::Path(_)));
    }

    #[test]
    fn multi_polygon_fans_out() {
        let ring = json!([[5.1, 52.1], [5.2, 52.1], [5.2, 52.2], [5.1, 52.1]]);
        let geom = json!({
            "type": "MultiPolygon",
            "coordinates": [[ring], [ring]],
        });
        let geometries = parse_geometry(&geom, Crs::Wgs, &DATUM).unwrap();
        assert_eq!(geometries.len(), 2);
        assert!(geometries.iter().all(|g| matches!(g, Geometry::Polygon(_))));
    }

    #[test]
    fn geometry_collection_concatenates_in_order() {
        let geom = json!({
            "type": "GeometryCollection",
            "geometries": [
                { "type": "Point", "coordinates": [5.1, 52.1] },
                { "type": "LineString", "coordinates": [[5.2, 52.2], [5.3, 52.3]] },
            ],
        });
        let geometries = parse_geometry(&geom, Crs::Wgs, &DATUM).unwrap();
        assert_eq!(geometries.len(), 2);
        assert!(matches!(geometries[0], Geometry::Point(_)));
        assert!(matches!(geometries[1], Geometry::Line(_)));
    }

    #[test]
    fn unknown_geometry_type_is_dropped() {
        let geom = json!({ "type": "Circle", "coordinates": [5.1, 52.1] });
        assert!(parse_geometry(&geom, Crs::Wgs, &DATUM).unwrap().is_empty());
    }

    #[test]
    fn properties_stringify_non_string_values() {
        let props = json!({
            "name": "test_name",
            "number": 42,
            "boolean": true,
            "array": [1, 2, 3],
        });
        let map = parse_properties(&props);
        assert_eq!(map.len(), 4);
        assert_eq!(map["name"], "test_name");
        assert_eq!(map["number"], "42");
        assert_eq!(map["boolean"], "true");
        assert_eq!(map["array"], "[1,2,3]");
    }

    #[test]
    fn absent_properties_default_to_empty() {
        assert!(parse_properties(&Value::Null).is_empty());
    }

    #[test]
    fn from_json_decodes_a_collection() {
        let doc = json!({
            "type": "FeatureCollection",
            "properties": header(),
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [5.1, 52.1, 10.0] },
                "properties": { "name": "test_point" },
            }],
        });

        let fc = from_json(doc).unwrap();
        assert_eq!(fc.crs, Crs::Wgs);
        assert_abs_diff_eq!(fc.datum.lat, 52.0);
        assert_abs_diff_eq!(fc.datum.lon, 5.0);
        assert_abs_diff_eq!(fc.heading.yaw, 2.0);
        assert_eq!(fc.features.len(), 1);
        assert_eq!(fc.features[0].properties["name"], "test_point");
    }

    #[test]
    fn root_without_string_type_is_malformed() {
        for root in [json!([1, 2]), json!({"features": []}), json!({"type": 123})] {
            assert!(matches!(
                from_json(root),
                Err(GeoError::MalformedDocument)
            ));
        }
    }

    #[test]
    fn bare_geometry_is_normalized_but_still_needs_header() {
        let root = json!({ "type": "Point", "coordinates": [5.1, 52.1, 0.0] });
        assert!(matches!(
            from_json(root),
            Err(GeoError::MissingProperties)
        ));
    }

    #[test]
    fn single_feature_is_normalized_but_still_needs_header() {
        let root = json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [5.1, 52.1, 0.0] },
            "properties": { "name": "single_point" },
        });
        assert!(matches!(
            from_json(root),
            Err(GeoError::MissingProperties)
        ));
    }

    #[test]
    fn header_defects_abort_with_distinct_errors() {
        let no_props = json!({ "type": "FeatureCollection", "features": [] });
        assert_eq!(
            from_json(no_props).unwrap_err().to_string(),
            "missing top-level 'properties'"
        );
        let non_object = json!({
            "type": "FeatureCollection",
            "properties": "invalid",
            "features": [],
        });
        assert_eq!(
            from_json(non_object).unwrap_err().to_string(),
            "missing top-level 'properties'"
        );

        let cases = [
            (
                json!({ "datum": [52.0, 5.0, 0.0], "heading": 0.0 }),
                "'properties' missing string 'crs'",
            ),
            (
                json!({ "crs": 123, "datum": [52.0, 5.0, 0.0], "heading": 0.0 }),
                "'properties' missing string 'crs'",
            ),
            (
                json!({ "crs": "EPSG:4326", "heading": 0.0 }),
                "'properties' missing array 'datum' of ≥3 numbers",
            ),
            (
                json!({ "crs": "EPSG:4326", "datum": "invalid", "heading": 0.0 }),
                "'properties' missing array 'datum' of ≥3 numbers",
            ),
            (
                json!({ "crs": "EPSG:4326", "datum": [52.0, 5.0], "heading": 0.0 }),
                "'properties' missing array 'datum' of ≥3 numbers",
            ),
            (
                json!({ "crs": "EPSG:4326", "datum": [52.0, 5.0, "x"], "heading": 0.0 }),
                "'properties' missing array 'datum' of ≥3 numbers",
            ),
            (
                json!({ "crs": "EPSG:4326", "datum": [52.0, 5.0, 0.0] }),
                "'properties' missing numeric 'heading'",
            ),
            (
                json!({ "crs": "EPSG:4326", "datum": [52.0, 5.0, 0.0], "heading": "x" }),
                "'properties' missing numeric 'heading'",
            ),
        ];
        for (props, message) in cases {
            let doc = json!({ "type": "FeatureCollection", "properties": props, "features": [] });
            assert_eq!(from_json(doc).unwrap_err().to_string(), message);
        }
    }

    #[test]
    fn datum_extra_elements_are_ignored() {
        let doc = json!({
            "type": "FeatureCollection",
            "properties": {
                "crs": "EPSG:4326",
                "datum": [52.0, 5.0, 0.0, 99.0, 42.0],
                "heading": 0.0,
            },
            "features": [],
        });
        let fc = from_json(doc).unwrap();
        assert_abs_diff_eq!(fc.datum.alt, 0.0);
    }

    #[test]
    fn null_geometry_features_are_skipped() {
        let doc = json!({
            "type": "FeatureCollection",
            "properties": header(),
            "features": [
                { "type": "Feature", "geometry": null, "properties": { "name": "null_geom" } },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [5.1, 52.1, 0.0] },
                    "properties": { "name": "valid_point" },
                },
            ],
        });
        let fc = from_json(doc).unwrap();
        assert_eq!(fc.features.len(), 1);
        assert_eq!(fc.features[0].properties["name"], "valid_point");
    }

    #[test]
    fn feature_without_properties_defaults_to_empty() {
        let doc = json!({
            "type": "FeatureCollection",
            "properties": header(),
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [5.1, 52.1, 0.0] },
            }],
        });
        let fc = from_json(doc).unwrap();
        assert_eq!(fc.features.len(), 1);
        assert!(fc.features[0].properties.is_empty());
    }

    #[test]
    fn fan_out_features_share_properties() {
        let doc = json!({
            "type": "FeatureCollection",
            "properties": header(),
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "MultiPoint",
                    "coordinates": [[5.1, 52.1], [5.2, 52.2], [5.3, 52.3]],
                },
                "properties": { "name": "shared" },
            }],
        });
        let fc = from_json(doc).unwrap();
        assert_eq!(fc.features.len(), 3);
        for feature in &fc.features {
            assert_eq!(feature.properties["name"], "shared");
        }
    }

    #[test]
    fn feature_id_is_captured_as_json_text() {
        let doc = json!({
            "type": "FeatureCollection",
            "properties": header(),
            "features": [
                {
                    "type": "Feature",
                    "id": "abc",
                    "geometry": { "type": "Point", "coordinates": [5.1, 52.1] },
                },
                {
                    "type": "Feature",
                    "id": 7,
                    "geometry": { "type": "Point", "coordinates": [5.1, 52.1] },
                },
            ],
        });
        let fc = from_json(doc).unwrap();
        assert_eq!(fc.features[0].id.as_deref(), Some("\"abc\""));
        assert_eq!(fc.features[1].id.as_deref(), Some("7"));
    }

    #[test]
    fn read_rejects_missing_file() {
        assert!(matches!(
            read("/nonexistent/path/file.geojson"),
            Err(GeoError::Read { .. })
        ));
    }
}
