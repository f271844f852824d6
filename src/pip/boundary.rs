//! Named electoral boundaries.

use serde_json::{Map, Value};

use super::geometry::{Geometry, GeometryError};
use super::ring::ContainsPoint;
use crate::models::GeoPoint;

/// A single constituency boundary with its display name
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: String,
    /// Sequence number from the source data (e.g. `AC_NO`), if any
    pub number: Option<String>,
    pub geometry: Geometry,
    /// Properties of the source feature, rendered back unchanged
    pub properties: Map<String, Value>,
}

impl Boundary {
    /// Build a boundary, rejecting geometry with non-finite vertices.
    pub fn new(
        name: impl Into<String>,
        number: Option<String>,
        geometry: Geometry,
    ) -> Result<Self, GeometryError> {
        geometry.validate()?;
        Ok(Self {
            name: name.into(),
            number,
            geometry,
            properties: Map::new(),
        })
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.geometry.contains_point(point)
    }

    /// Get the bounding box of this boundary
    pub fn bbox(&self) -> Option<[f64; 4]> {
        self.geometry.bbox()
    }
}

/// Input to index construction whose geometry may have failed conversion
#[derive(Debug, Clone)]
pub struct BoundaryCandidate {
    pub name: String,
    pub number: Option<String>,
    pub geometry: Result<Geometry, GeometryError>,
    pub properties: Map<String, Value>,
}

/// A candidate left out of the index, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBoundary {
    pub name: String,
    pub error: GeometryError,
}
