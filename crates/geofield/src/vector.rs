//! Field vector layer: one boundary polygon plus typed annotation elements
//!
//! A `Vector` views a feature collection as a single field: the feature whose
//! `type` property is `"field"` (or, failing that, the first polygon) becomes
//! the boundary, and every other feature becomes an [`Element`] tagged with
//! its `type` property.

use std::collections::HashMap;

use tangent_frame::{Datum, Euler, Line, Path, Point, Polygon};

use crate::{Crs, Feature, FeatureCollection, GeoError, Geometry, Result};

/// One annotation inside a field: a geometry, its properties, and a type tag
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub geometry: Geometry,
    pub properties: HashMap<String, String>,
    pub kind: String,
}

/// A field boundary with annotation elements over one datum/heading/crs
///
/// Like [`FeatureCollection`], all coordinates are local-frame; changing the
/// datum relabels the frame without moving stored geometry.
#[derive(Debug, Clone)]
pub struct Vector {
    boundary: Polygon,
    boundary_properties: HashMap<String, String>,
    elements: Vec<Element>,
    datum: Datum,
    heading: Euler,
    crs: Crs,
}

impl Vector {
    /// Create a field with default frame parameters (zero datum and heading,
    /// local output flavor)
    pub fn new(boundary: Polygon) -> Self {
        Self::with_frame(boundary, Datum::default(), Euler::default(), Crs::Enu)
    }

    pub fn with_frame(boundary: Polygon, datum: Datum, heading: Euler, crs: Crs) -> Self {
        Self {
            boundary,
            boundary_properties: HashMap::new(),
            elements: Vec::new(),
            datum,
            heading,
            crs,
        }
    }

    /// Load a field from a GeoJSON file
    ///
    /// The boundary is the feature explicitly typed `"field"` if present,
    /// otherwise the first polygon. All other features become elements.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let fc = crate::read(path)?;
        if fc.features.is_empty() {
            return Err(GeoError::EmptyCollection);
        }

        let is_field =
            |feature: &Feature| feature.properties.get("type").is_some_and(|t| t == "field");

        let boundary_feature = fc
            .features
            .iter()
            .find(|f| f.geometry.as_polygon().is_some() && is_field(f))
            .or_else(|| {
                fc.features
                    .iter()
                    .find(|f| f.geometry.as_polygon().is_some())
            })
            .ok_or(GeoError::NoFieldBoundary)?;

        let mut vector = Self::with_frame(
            boundary_feature
                .geometry
                .as_polygon()
                .cloned()
                .unwrap_or_default(),
            fc.datum,
            fc.heading,
            fc.crs,
        );
        vector.boundary_properties = boundary_feature.properties.clone();

        for feature in &fc.features {
            if is_field(feature) {
                continue;
            }
            let kind = feature
                .properties
                .get("type")
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            vector.elements.push(Element {
                geometry: feature.geometry.clone(),
                properties: feature.properties.clone(),
                kind,
            });
        }

        Ok(vector)
    }

    /// Write the field to a GeoJSON file in the requested coordinate flavor
    ///
    /// The boundary is emitted first, tagged `type: "field"`, followed by the
    /// elements in insertion order.
    pub fn to_file(&self, path: impl AsRef<std::path::Path>, crs: Crs) -> Result<()> {
        let mut boundary_properties = self.boundary_properties.clone();
        boundary_properties.insert("type".to_string(), "field".to_string());

        let mut features = Vec::with_capacity(self.elements.len() + 1);
        features.push(Feature::new(
            Geometry::Polygon(self.boundary.clone()),
            boundary_properties,
        ));
        for element in &self.elements {
            features.push(Feature::new(
                element.geometry.clone(),
                element.properties.clone(),
            ));
        }

        let fc = FeatureCollection {
            crs,
            datum: self.datum,
            heading: self.heading,
            features,
        };
        crate::write_as(&fc, path, crs)
    }

    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    pub fn set_boundary(&mut self, boundary: Polygon) {
        self.boundary = boundary;
    }

    pub fn boundary_properties(&self) -> &HashMap<String, String> {
        &self.boundary_properties
    }

    pub fn set_boundary_property(&mut self, key: &str, value: &str) {
        self.boundary_properties
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove_boundary_property(&mut self, key: &str) {
        self.boundary_properties.remove(key);
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }

    pub fn clear_elements(&mut self) {
        self.elements.clear();
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn add_element(
        &mut self,
        geometry: Geometry,
        kind: &str,
        properties: HashMap<String, String>,
    ) {
        let mut properties = properties;
        if !kind.is_empty() {
            properties.insert("type".to_string(), kind.to_string());
        }
        self.elements.push(Element {
            geometry,
            properties,
            kind: kind.to_string(),
        });
    }

    pub fn remove_element(&mut self, index: usize) {
        if index < self.elements.len() {
            self.elements.remove(index);
        }
    }

    pub fn add_point(&mut self, point: Point, kind: &str, properties: HashMap<String, String>) {
        self.add_element(Geometry::Point(point), kind, properties);
    }

    pub fn add_line(&mut self, line: Line, kind: &str, properties: HashMap<String, String>) {
        self.add_element(Geometry::Line(line), kind, properties);
    }

    pub fn add_path(&mut self, path: Path, kind: &str, properties: HashMap<String, String>) {
        self.add_element(Geometry::Path(path), kind, properties);
    }

    pub fn add_polygon(
        &mut self,
        polygon: Polygon,
        kind: &str,
        properties: HashMap<String, String>,
    ) {
        self.add_element(Geometry::Polygon(polygon), kind, properties);
    }

    pub fn elements_by_kind(&self, kind: &str) -> Vec<&Element> {
        self.elements.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn points(&self) -> Vec<&Element> {
        self.elements_matching(|g| matches!(g, Geometry::Point(_)))
    }

    pub fn lines(&self) -> Vec<&Element> {
        self.elements_matching(|g| matches!(g, Geometry::Line(_)))
    }

    pub fn paths(&self) -> Vec<&Element> {
        self.elements_matching(|g| matches!(g, Geometry::Path(_)))
    }

    pub fn polygons(&self) -> Vec<&Element> {
        self.elements_matching(|g| matches!(g, Geometry::Polygon(_)))
    }

    fn elements_matching(&self, predicate: impl Fn(&Geometry) -> bool) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| predicate(&e.geometry))
            .collect()
    }

    pub fn filter_by_property(&self, key: &str, value: &str) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| e.properties.get(key).is_some_and(|v| v == value))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    /// Relabel the frame origin; stored geometry is not re-projected
    pub fn set_datum(&mut self, datum: Datum) {
        self.datum = datum;
    }

    pub fn heading(&self) -> &Euler {
        &self.heading
    }

    pub fn set_heading(&mut self, heading: Euler) {
        self.heading = heading;
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn set_crs(&mut self, crs: Crs) {
        self.crs = crs;
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
