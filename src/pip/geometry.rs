//! Boundary geometry: polygons with holes and multi-part polygons.

use geo::BoundingRect;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use thiserror::Error;

use super::ring::{ContainsPoint, Ring};
use crate::models::GeoPoint;

/// Reasons a boundary's geometry cannot take part in containment tests
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("unsupported geometry type {0:?}")]
    Unsupported(String),

    #[error("malformed geometry: {0}")]
    Malformed(String),
}

/// One exterior ring with zero or more holes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimplePolygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl SimplePolygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }
}

impl ContainsPoint for SimplePolygon {
    fn contains_point(&self, point: GeoPoint) -> bool {
        if self.exterior.is_empty() || !self.exterior.contains_point(point) {
            return false;
        }
        !self.holes.iter().any(|hole| hole.contains_point(point))
    }
}

impl Serialize for SimplePolygon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(1 + self.holes.len()))?;
        for ring in self.rings() {
            seq.serialize_element(ring)?;
        }
        seq.end()
    }
}

/// Ordered parts of a multi-part boundary
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct MultiPolygon(pub Vec<SimplePolygon>);

impl ContainsPoint for MultiPolygon {
    fn contains_point(&self, point: GeoPoint) -> bool {
        self.0.iter().any(|part| part.contains_point(point))
    }
}

/// Geometry of a boundary. Serializes as a GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(SimplePolygon),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// Every ring in the geometry, exteriors and holes alike
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            Geometry::Polygon(p) => Box::new(p.rings()),
            Geometry::MultiPolygon(mp) => Box::new(mp.0.iter().flat_map(|p| p.rings())),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.rings().map(Ring::len).sum()
    }

    /// Reject vertices that would poison the crossing arithmetic.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (ring_idx, ring) in self.rings().enumerate() {
            if let Some(pos) = ring
                .coords()
                .iter()
                .position(|c| !c.x.is_finite() || !c.y.is_finite())
            {
                return Err(GeometryError::Malformed(format!(
                    "non-finite vertex {} in ring {}",
                    pos, ring_idx
                )));
            }
        }
        Ok(())
    }

    /// Convert into `geo` types (for bounding boxes and rendering helpers)
    pub fn to_geo(&self) -> geo::MultiPolygon<f64> {
        fn polygon(p: &SimplePolygon) -> geo::Polygon<f64> {
            geo::Polygon::new(
                geo::LineString::new(p.exterior.coords().to_vec()),
                p.holes
                    .iter()
                    .map(|h| geo::LineString::new(h.coords().to_vec()))
                    .collect(),
            )
        }

        match self {
            Geometry::Polygon(p) => geo::MultiPolygon::new(vec![polygon(p)]),
            Geometry::MultiPolygon(mp) => geo::MultiPolygon::new(mp.0.iter().map(polygon).collect()),
        }
    }

    /// Bounding box as `[min_lon, min_lat, max_lon, max_lat]`
    pub fn bbox(&self) -> Option<[f64; 4]> {
        self.to_geo()
            .bounding_rect()
            .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y])
    }
}

impl ContainsPoint for Geometry {
    fn contains_point(&self, point: GeoPoint) -> bool {
        match self {
            Geometry::Polygon(p) => p.contains_point(point),
            Geometry::MultiPolygon(mp) => mp.contains_point(point),
        }
    }
}

impl From<SimplePolygon> for Geometry {
    fn from(p: SimplePolygon) -> Self {
        Geometry::Polygon(p)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Geometry::MultiPolygon(mp)
    }
}
