//! Even-odd (ray casting) containment for a single closed ring.

use geo_types::Coord;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::models::GeoPoint;

/// Point containment against a planar shape.
pub trait ContainsPoint {
    fn contains_point(&self, point: GeoPoint) -> bool;
}

/// Closed polygon outline. Vertices are `x = longitude`, `y = latitude`.
///
/// The closing edge between the last and first vertex is implicit, so a
/// repeated closing vertex (as GeoJSON writes rings) is accepted but not
/// required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring(Vec<Coord<f64>>);

impl Ring {
    pub fn new(coords: Vec<Coord<f64>>) -> Self {
        Self(coords)
    }

    /// Build a ring from `(x, y)` pairs
    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        Self(points.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fewer than three vertices cannot enclose any area.
    pub fn is_degenerate(&self) -> bool {
        self.0.len() < 3
    }
}

impl ContainsPoint for Ring {
    fn contains_point(&self, point: GeoPoint) -> bool {
        if self.is_degenerate() {
            return false;
        }

        let (lon, lat) = (point.lon, point.lat);
        let coords = &self.0;
        let mut inside = false;

        // Edge (j, i) walks every side, starting with the wrap-around edge
        let mut j = coords.len() - 1;
        for i in 0..coords.len() {
            let (a, b) = (coords[i], coords[j]);

            // Strict `>` on both ends means a.y != b.y whenever this holds
            if (a.y > lat) != (b.y > lat) {
                let crossing = (b.x - a.x) * (lat - a.y) / (b.y - a.y) + a.x;
                if lon < crossing {
                    inside = !inside;
                }
            }

            j = i;
        }

        inside
    }
}

impl Serialize for Ring {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for c in &self.0 {
            seq.serialize_element(&[c.x, c.y])?;
        }
        seq.end()
    }
}
