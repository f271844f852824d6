//! Ordered boundary collection with case-insensitive name lookup.

use hashbrown::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::boundary::{Boundary, BoundaryCandidate, SkippedBoundary};

/// Immutable set of boundaries in scan order
#[derive(Debug, Default)]
pub struct BoundaryIndex {
    /// Insertion order is the scan order
    boundaries: Vec<Arc<Boundary>>,
    /// Lower-cased name -> position of the first boundary with that name
    by_name: HashMap<String, usize>,
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}

impl BoundaryIndex {
    /// Build the index from boundaries, keeping their order
    pub fn build(boundaries: Vec<Boundary>) -> Self {
        info!("Building boundary index for {} boundaries...", boundaries.len());

        let mut by_name = HashMap::with_capacity(boundaries.len());
        let boundaries: Vec<Arc<Boundary>> = boundaries.into_iter().map(Arc::new).collect();

        for (pos, boundary) in boundaries.iter().enumerate() {
            let key = normalize(&boundary.name);
            if by_name.contains_key(&key) {
                warn!(
                    "Duplicate boundary name '{}' at position {}; lookups return the first",
                    boundary.name, pos
                );
                continue;
            }
            by_name.insert(key, pos);
        }

        let vertices: usize = boundaries.iter().map(|b| b.geometry.vertex_count()).sum();
        info!(
            "Boundary index built with {} entries ({} vertices)",
            boundaries.len(),
            vertices
        );

        Self {
            boundaries,
            by_name,
        }
    }

    /// Build from loader output, leaving out every candidate whose geometry
    /// failed conversion or validation.
    pub fn build_from_candidates(candidates: Vec<BoundaryCandidate>) -> (Self, Vec<SkippedBoundary>) {
        let mut accepted = Vec::with_capacity(candidates.len());
        let mut skipped = Vec::new();

        for candidate in candidates {
            let result = candidate.geometry.and_then(|geometry| {
                Boundary::new(candidate.name.clone(), candidate.number, geometry)
                    .map(|boundary| boundary.with_properties(candidate.properties))
            });

            match result {
                Ok(boundary) => accepted.push(boundary),
                Err(error) => {
                    warn!("Skipping boundary '{}': {}", candidate.name, error);
                    skipped.push(SkippedBoundary {
                        name: candidate.name,
                        error,
                    });
                }
            }
        }

        (Self::build(accepted), skipped)
    }

    /// Case-insensitive lookup by name
    pub fn lookup(&self, name: &str) -> Option<&Arc<Boundary>> {
        self.by_name
            .get(&normalize(name))
            .map(|&pos| &self.boundaries[pos])
    }

    /// Iterate over boundaries in scan order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Boundary>> {
        self.boundaries.iter()
    }

    /// Boundary names in scan order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.boundaries.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}
