//! Resolver that finds the boundary containing a point.

use std::sync::Arc;
use tracing::{debug, warn};

use super::{Boundary, BoundaryIndex};
use crate::models::GeoPoint;

/// Point-in-Polygon lookup over a linear scan of the index
#[derive(Debug, Default)]
pub struct BoundaryResolver {
    index: BoundaryIndex,
}

impl BoundaryResolver {
    /// Create a new resolver from a boundary index
    pub fn new(index: BoundaryIndex) -> Self {
        Self { index }
    }

    /// Return the first boundary in scan order that contains `point`.
    ///
    /// Boundaries are expected not to overlap; if they do, the earlier one
    /// wins.
    pub fn resolve(&self, point: GeoPoint) -> Option<Arc<Boundary>> {
        let found = self.index.iter().find(|b| b.contains(point)).cloned();

        match &found {
            Some(boundary) => debug!("PIP lookup at {}: matched '{}'", point, boundary.name),
            None => warn!("PIP lookup at {}: no boundary contains the point", point),
        }

        found
    }

    /// Get the boundary index
    pub fn index(&self) -> &BoundaryIndex {
        &self.index
    }
}
