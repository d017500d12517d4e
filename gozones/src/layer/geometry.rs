//! GeoJSON payloads backing zone layers.
//!
//! Geometry is opaque to the core: it is validated enough to know the
//! surface can draw it, and a bounding box is kept for diagnostics. No
//! reprojection or simplification happens here.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while decoding a GeoJSON document.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid GeoJSON: {0}")]
    Invalid(String),
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Bounds {
    fn point(lng: f64, lat: f64) -> Self {
        Self {
            min_lng: lng,
            min_lat: lat,
            max_lng: lng,
            max_lat: lat,
        }
    }

    fn extend(&mut self, lng: f64, lat: f64) {
        self.min_lng = self.min_lng.min(lng);
        self.min_lat = self.min_lat.min(lat);
        self.max_lng = self.max_lng.max(lng);
        self.max_lat = self.max_lat.max(lat);
    }
}

/// One feature of a region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    /// Raw GeoJSON geometry object, `None` for unlocated features.
    pub geometry: Option<Value>,
    pub properties: Map<String, Value>,
}

/// A parsed feature collection.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRegion {
    features: Vec<RegionFeature>,
    bounds: Option<Bounds>,
}

impl GeoRegion {
    /// Decodes a GeoJSON document.
    ///
    /// Accepts a `FeatureCollection`, a single `Feature`, or a bare
    /// geometry; the latter two become a one-feature collection.
    pub fn from_slice(body: &[u8]) -> Result<Self, GeometryError> {
        let document: Value = serde_json::from_slice(body)?;
        Self::from_value(document)
    }

    /// Decodes an already-parsed GeoJSON value.
    pub fn from_value(document: Value) -> Result<Self, GeometryError> {
        let mut region = Self {
            features: Vec::new(),
            bounds: None,
        };

        let kind = type_of(&document)?.to_string();
        match kind.as_str() {
            "FeatureCollection" => {
                let features = document
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        GeometryError::Invalid("FeatureCollection without a features array".into())
                    })?;
                for feature in features {
                    region.push_feature(feature)?;
                }
            }
            "Feature" => region.push_feature(&document)?,
            _ => region.push_geometry(Some(document), Map::new())?,
        }

        Ok(region)
    }

    /// Features in document order.
    pub fn features(&self) -> &[RegionFeature] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Bounding box over every position, `None` if nothing is located.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn push_feature(&mut self, feature: &Value) -> Result<(), GeometryError> {
        if type_of(feature)? != "Feature" {
            return Err(GeometryError::Invalid(
                "features must contain Feature objects".into(),
            ));
        }
        let geometry = match feature.get("geometry") {
            None | Some(Value::Null) => None,
            Some(g) => Some(g.clone()),
        };
        let properties = feature
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        self.push_geometry(geometry, properties)
    }

    fn push_geometry(
        &mut self,
        geometry: Option<Value>,
        properties: Map<String, Value>,
    ) -> Result<(), GeometryError> {
        if let Some(ref g) = geometry {
            self.visit_geometry(g)?;
        }
        self.features.push(RegionFeature {
            geometry,
            properties,
        });
        Ok(())
    }

    fn visit_geometry(&mut self, geometry: &Value) -> Result<(), GeometryError> {
        let kind = type_of(geometry)?;
        if kind == "GeometryCollection" {
            let members = geometry
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    GeometryError::Invalid("GeometryCollection without geometries".into())
                })?;
            for member in members {
                self.visit_geometry(member)?;
            }
            return Ok(());
        }

        let depth = nesting_depth(kind)
            .ok_or_else(|| GeometryError::Invalid(format!("unknown geometry type '{}'", kind)))?;
        let coordinates = geometry
            .get("coordinates")
            .ok_or_else(|| GeometryError::Invalid(format!("{} without coordinates", kind)))?;
        self.visit_positions(coordinates, depth)
    }

    fn visit_positions(&mut self, value: &Value, depth: usize) -> Result<(), GeometryError> {
        let items = value
            .as_array()
            .ok_or_else(|| GeometryError::Invalid("coordinates must be arrays".into()))?;

        if depth > 0 {
            for item in items {
                self.visit_positions(item, depth - 1)?;
            }
            return Ok(());
        }

        let (lng, lat) = match items.as_slice() {
            [lng, lat, ..] => (lng.as_f64(), lat.as_f64()),
            _ => (None, None),
        };
        let (Some(lng), Some(lat)) = (lng, lat) else {
            return Err(GeometryError::Invalid(format!(
                "position {} is not [lng, lat]",
                value
            )));
        };

        match self.bounds.as_mut() {
            Some(bounds) => bounds.extend(lng, lat),
            None => self.bounds = Some(Bounds::point(lng, lat)),
        }
        Ok(())
    }
}

fn type_of(value: &Value) -> Result<&str, GeometryError> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeometryError::Invalid("object without a 'type' member".into()))
}

/// How many array levels wrap a single position for each geometry type.
fn nesting_depth(kind: &str) -> Option<usize> {
    match kind {
        "Point" => Some(0),
        "MultiPoint" | "LineString" => Some(1),
        "MultiLineString" | "Polygon" => Some(2),
        "MultiPolygon" => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RING: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Publix 15mi"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-82.0, 27.0], [-81.0, 27.0], [-81.0, 28.5], [-82.0, 27.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": {"type": "Point", "coordinates": [-83.5, 26.0]}
            }
        ]
    }"#;

    #[test]
    fn test_feature_collection() {
        let region = GeoRegion::from_slice(RING.as_bytes()).unwrap();
        assert_eq!(region.feature_count(), 2);
        assert_eq!(
            region.features()[0].properties.get("name"),
            Some(&Value::from("Publix 15mi"))
        );
        assert_eq!(
            region.bounds(),
            Some(Bounds {
                min_lng: -83.5,
                min_lat: 26.0,
                max_lng: -81.0,
                max_lat: 28.5,
            })
        );
    }

    #[test]
    fn test_single_feature_and_bare_geometry() {
        let feature = r#"{"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[-82,27],[-81,28]]}}"#;
        assert_eq!(
            GeoRegion::from_slice(feature.as_bytes())
                .unwrap()
                .feature_count(),
            1
        );

        let bare = r#"{"type":"MultiPolygon","coordinates":[[[[-82,27],[-81,27],[-81,28],[-82,27]]]]}"#;
        let region = GeoRegion::from_slice(bare.as_bytes()).unwrap();
        assert_eq!(region.feature_count(), 1);
        assert!(region.bounds().is_some());
    }

    #[test]
    fn test_null_geometry_allowed() {
        let doc = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":null}]}"#;
        let region = GeoRegion::from_slice(doc.as_bytes()).unwrap();
        assert_eq!(region.feature_count(), 1);
        assert!(region.bounds().is_none());
    }

    #[test]
    fn test_geometry_collection() {
        let doc = r#"{"type":"GeometryCollection","geometries":[
            {"type":"Point","coordinates":[-80.1,25.8]},
            {"type":"Point","coordinates":[-87.2,30.4]}
        ]}"#;
        let bounds = GeoRegion::from_slice(doc.as_bytes())
            .unwrap()
            .bounds()
            .unwrap();
        assert_eq!(bounds.min_lng, -87.2);
        assert_eq!(bounds.max_lat, 30.4);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GeoRegion::from_slice(b"{not json"),
            Err(GeometryError::Json(_))
        ));
    }

    #[test]
    fn test_structural_errors() {
        let cases = [
            r#"{"features": []}"#,
            r#"{"type":"FeatureCollection"}"#,
            r#"{"type":"FeatureCollection","features":[{"type":"Point","coordinates":[0,0]}]}"#,
            r#"{"type":"Circle","coordinates":[0,0]}"#,
            r#"{"type":"Polygon"}"#,
            r#"{"type":"Polygon","coordinates":[[0,0]]}"#,
            r#"{"type":"Point","coordinates":["a","b"]}"#,
        ];
        for case in cases {
            assert!(
                matches!(
                    GeoRegion::from_slice(case.as_bytes()),
                    Err(GeometryError::Invalid(_))
                ),
                "expected Invalid for {}",
                case
            );
        }
    }
}
