//! GeoJSON FeatureCollection parsing and rendering for boundaries.

use std::borrow::Cow;

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::representative::scalar_to_string;
use crate::pip::{Boundary, BoundaryCandidate, Geometry, GeometryError, MultiPolygon, Ring, SimplePolygon};

/// Property keys carrying the boundary name, in order of preference
const NAME_KEYS: &[&str] = &["AC_NAME", "AC_Name", "ac_name"];

/// Property keys carrying the boundary sequence number, in order of preference.
/// Empty values fall through to the next key.
const NUMBER_KEYS: &[&str] = &["AC_Code", "AC_NO"];

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
}

/// Geometry object as found on disk, before its type is checked
#[derive(Debug, Deserialize)]
pub struct RawGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

type Position = Vec<f64>;

impl TryFrom<&RawGeometry> for Geometry {
    type Error = GeometryError;

    fn try_from(raw: &RawGeometry) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            "Polygon" => {
                let rings: Vec<Vec<Position>> = parse_coordinates(&raw.coordinates)?;
                Ok(Geometry::Polygon(polygon(rings)?))
            }
            "MultiPolygon" => {
                let parts: Vec<Vec<Vec<Position>>> = parse_coordinates(&raw.coordinates)?;
                let parts = parts
                    .into_iter()
                    .map(polygon)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Geometry::MultiPolygon(MultiPolygon(parts)))
            }
            other => Err(GeometryError::Unsupported(other.to_string())),
        }
    }
}

fn parse_coordinates<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, GeometryError> {
    T::deserialize(value).map_err(|e| GeometryError::Malformed(e.to_string()))
}

fn polygon(rings: Vec<Vec<Position>>) -> Result<SimplePolygon, GeometryError> {
    let mut rings = rings.into_iter().map(ring);
    let exterior = match rings.next() {
        Some(exterior) => exterior?,
        None => return Ok(SimplePolygon::default()),
    };
    let holes = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(SimplePolygon::new(exterior, holes))
}

fn ring(positions: Vec<Position>) -> Result<Ring, GeometryError> {
    positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(GeometryError::Malformed(format!(
                "position with {} value(s)",
                p.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Ring::new)
}

/// First key in `keys` whose value survives `convert`
fn first_property<'a, T>(
    properties: &'a Map<String, Value>,
    keys: &[&str],
    convert: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    keys.iter().find_map(|k| properties.get(*k).and_then(&convert))
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

impl Feature {
    pub fn name(&self) -> Option<&str> {
        first_property(self.properties.as_ref()?, NAME_KEYS, non_empty_str)
    }

    pub fn number(&self) -> Option<String> {
        first_property(self.properties.as_ref()?, NUMBER_KEYS, |value| {
            scalar_to_string(value)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
    }

    pub fn geometry(&self) -> Result<Geometry, GeometryError> {
        match &self.geometry {
            Some(raw) => Geometry::try_from(raw),
            None => Err(GeometryError::Malformed("missing geometry".to_string())),
        }
    }
}

impl FeatureCollection {
    /// Convert features to index candidates. Features without a usable name
    /// are dropped; the count of dropped features is returned alongside.
    pub fn into_candidates(self) -> (Vec<BoundaryCandidate>, usize) {
        let mut candidates = Vec::with_capacity(self.features.len());
        let mut unnamed = 0;

        for (pos, feature) in self.features.into_iter().enumerate() {
            let Some(name) = feature.name().map(str::to_string) else {
                warn!("Skipping feature {}: no boundary name property", pos);
                unnamed += 1;
                continue;
            };

            candidates.push(BoundaryCandidate {
                name,
                number: feature.number(),
                geometry: feature.geometry(),
                properties: feature.properties.unwrap_or_default(),
            });
        }

        (candidates, unnamed)
    }
}

/// Single-feature collection for rendering one boundary
#[derive(Debug, Serialize)]
pub struct BoundaryFeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: [BoundaryFeature<'a>; 1],
}

#[derive(Debug, Serialize)]
struct BoundaryFeature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bbox: Option<[f64; 4]>,
    properties: Cow<'a, Map<String, Value>>,
    geometry: &'a Geometry,
}

/// Source properties when the boundary has them, otherwise just its name and number
fn properties(boundary: &Boundary) -> Cow<'_, Map<String, Value>> {
    if !boundary.properties.is_empty() {
        return Cow::Borrowed(&boundary.properties);
    }

    let mut properties = Map::new();
    properties.insert("AC_NAME".to_string(), Value::from(boundary.name.as_str()));
    if let Some(number) = &boundary.number {
        properties.insert("AC_NO".to_string(), Value::from(number.as_str()));
    }
    Cow::Owned(properties)
}

impl<'a> From<&'a Boundary> for BoundaryFeatureCollection<'a> {
    fn from(boundary: &'a Boundary) -> Self {
        Self {
            kind: "FeatureCollection",
            features: [BoundaryFeature {
                kind: "Feature",
                bbox: boundary.bbox(),
                properties: properties(boundary),
                geometry: &boundary.geometry,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use crate::pip::ContainsPoint;
    use serde_json::json;

    fn feature(value: Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_polygon_with_hole() {
        let f = feature(json!({
            "type": "Feature",
            "properties": {"AC_NAME": "Shivajinagar", "AC_NO": 157},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[77.40, 12.80], [77.80, 12.80], [77.80, 13.10], [77.40, 13.10], [77.40, 12.80]],
                    [[77.58, 12.96], [77.62, 12.96], [77.62, 13.00], [77.58, 13.00], [77.58, 12.96]]
                ]
            }
        }));

        assert_eq!(f.name(), Some("Shivajinagar"));
        assert_eq!(f.number().as_deref(), Some("157"));

        let geometry = f.geometry().unwrap();
        assert!(geometry.contains_point(GeoPoint::new(12.85, 77.45)));
        assert!(!geometry.contains_point(GeoPoint::new(12.98, 77.60)));
    }

    #[test]
    fn test_multipolygon() {
        let f = feature(json!({
            "properties": {"AC_Name": "Mahadevapura"},
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[77.50, 12.90], [77.60, 12.90], [77.60, 13.00], [77.50, 13.00], [77.50, 12.90]]],
                    [[[77.70, 12.90], [77.80, 12.90], [77.80, 13.00], [77.70, 13.00], [77.70, 12.90]]]
                ]
            }
        }));

        assert_eq!(f.name(), Some("Mahadevapura"));
        let geometry = f.geometry().unwrap();
        assert!(geometry.contains_point(GeoPoint::new(12.95, 77.75)));
        assert!(!geometry.contains_point(GeoPoint::new(12.95, 77.65)));
    }

    #[test]
    fn test_unsupported_and_malformed() {
        let point = feature(json!({
            "properties": {"AC_NAME": "Magadi"},
            "geometry": {"type": "Point", "coordinates": [77.2, 12.9]}
        }));
        assert_eq!(
            point.geometry(),
            Err(GeometryError::Unsupported("Point".to_string()))
        );

        let short = feature(json!({
            "properties": {"AC_NAME": "Magadi"},
            "geometry": {"type": "Polygon", "coordinates": [[[77.2, 12.9], [], [77.3, 13.0]]]}
        }));
        assert!(matches!(short.geometry(), Err(GeometryError::Malformed(_))));

        let missing = feature(json!({"properties": {"AC_NAME": "Magadi"}, "geometry": null}));
        assert!(matches!(missing.geometry(), Err(GeometryError::Malformed(_))));

        let garbage = feature(json!({
            "properties": {"AC_NAME": "Magadi"},
            "geometry": {"type": "Polygon", "coordinates": "nope"}
        }));
        assert!(matches!(garbage.geometry(), Err(GeometryError::Malformed(_))));
    }

    #[test]
    fn test_empty_polygon_is_accepted_but_contains_nothing() {
        let f = feature(json!({
            "properties": {"ac_name": "Kanakapura"},
            "geometry": {"type": "Polygon", "coordinates": []}
        }));
        let geometry = f.geometry().unwrap();
        assert!(!geometry.contains_point(GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn test_into_candidates_drops_unnamed() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"AC_NAME": "Hebbal", "AC_Code": "158"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1]]]}},
                {"properties": {"DIST_NAME": "BANGALORE"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1]]]}},
                {"properties": null, "geometry": null}
            ]
        }))
        .unwrap();

        let (candidates, unnamed) = collection.into_candidates();
        assert_eq!(unnamed, 2);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Hebbal");
        assert_eq!(candidates[0].number.as_deref(), Some("158"));
        assert!(candidates[0].geometry.is_ok());
    }

    #[test]
    fn test_empty_name_falls_through_to_next_key() {
        let f = feature(json!({
            "properties": {"AC_NAME": "", "AC_Name": "Hebbal", "AC_NO": "", "AC_Code": 158},
            "geometry": null
        }));
        assert_eq!(f.name(), Some("Hebbal"));
        assert_eq!(f.number().as_deref(), Some("158"));

        let blank = feature(json!({"properties": {"AC_NAME": "  ", "ac_name": "Chickpet"}}));
        assert_eq!(blank.name(), Some("Chickpet"));
    }

    #[test]
    fn test_empty_number_falls_through_to_next_key() {
        let f = feature(json!({"properties": {"AC_NAME": "Hebbal", "AC_Code": "", "AC_NO": 158}}));
        assert_eq!(f.number().as_deref(), Some("158"));

        let none = feature(json!({"properties": {"AC_NAME": "Hebbal", "AC_Code": null, "AC_NO": ""}}));
        assert_eq!(none.number(), None);
    }

    #[test]
    fn test_ac_code_preferred_over_ac_no() {
        let f = feature(json!({"properties": {"AC_NAME": "Shivajinagar", "AC_NO": "157", "AC_Code": "42"}}));
        assert_eq!(f.number().as_deref(), Some("42"));
    }

    #[test]
    fn test_candidates_keep_source_properties() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "features": [
                {"properties": {"AC_NAME": "Hebbal", "AC_NO": 158, "DIST_NAME": "BANGALORE"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1]]]}}
            ]
        }))
        .unwrap();

        let (candidates, _) = collection.into_candidates();
        assert_eq!(candidates[0].properties["DIST_NAME"], "BANGALORE");
        assert_eq!(candidates[0].properties["AC_NO"], 158);
    }

    #[test]
    fn test_render_keeps_source_properties() {
        let geometry = Geometry::Polygon(SimplePolygon::new(
            Ring::from_xy(&[(77.5, 12.9), (77.6, 12.9), (77.6, 13.0)]),
            vec![],
        ));
        let source = json!({"AC_Name": "Hebbal", "AC_Code": 158, "PC_NAME": "Bangalore North"});
        let boundary = Boundary::new("Hebbal", Some("158".into()), geometry)
            .unwrap()
            .with_properties(source.as_object().cloned().unwrap());

        let json = serde_json::to_value(BoundaryFeatureCollection::from(&boundary)).unwrap();
        assert_eq!(json["features"][0]["properties"], source);
    }

    #[test]
    fn test_render_boundary_feature() {
        let geometry = Geometry::Polygon(SimplePolygon::new(
            Ring::from_xy(&[(77.5, 12.9), (77.6, 12.9), (77.6, 13.0), (77.5, 12.9)]),
            vec![],
        ));
        let boundary = Boundary::new("Chickpet", Some("169".into()), geometry).unwrap();

        let json = serde_json::to_value(BoundaryFeatureCollection::from(&boundary)).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        let feature = &json["features"][0];
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["properties"], json!({"AC_NAME": "Chickpet", "AC_NO": "169"}));
        assert_eq!(feature["geometry"]["type"], "Polygon");
        assert_eq!(feature["bbox"], json!([77.5, 12.9, 77.6, 13.0]));
    }
}
