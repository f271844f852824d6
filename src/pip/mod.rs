//! Point-in-Polygon (PIP) boundary resolution.
//!
//! Ray-casting containment over named polygons and multipolygons, with a
//! first-match linear scan across all boundaries.

mod boundary;
mod geometry;
mod index;
mod ring;
mod service;

pub use boundary::{Boundary, BoundaryCandidate, SkippedBoundary};
pub use geometry::{Geometry, GeometryError, MultiPolygon, SimplePolygon};
pub use index::BoundaryIndex;
pub use ring::{ContainsPoint, Ring};
pub use service::BoundaryResolver;
