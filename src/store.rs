//! The loaded, immutable data set and its publication lifecycle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::info;

use crate::models::GeoPoint;
use crate::parent::ParentMapper;
use crate::pip::{Boundary, BoundaryIndex, BoundaryResolver};
use crate::records::{RecordAssembler, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("data store not initialised")]
    Uninitialized,

    #[error("data store already initialised")]
    AlreadyInitialized,
}

/// Sorted names of everything the store knows about
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnownNames {
    pub boundaries: Vec<String>,
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreStats {
    pub boundaries: usize,
    pub boundary_records: usize,
    pub parent_records: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Boundary index, parent table and record stores, read-only once built.
#[derive(Debug)]
pub struct DataStore {
    resolver: BoundaryResolver,
    parents: ParentMapper,
    assembler: RecordAssembler,
    loaded_at: DateTime<Utc>,
}

impl DataStore {
    pub fn new(index: BoundaryIndex, parents: ParentMapper, assembler: RecordAssembler) -> Self {
        Self {
            resolver: BoundaryResolver::new(index),
            parents,
            assembler,
            loaded_at: Utc::now(),
        }
    }

    /// Resolve a coordinate to its boundary, parent and representatives.
    pub fn resolve(&self, lat: f64, lon: f64) -> Option<Resolution> {
        let boundary = self.resolver.resolve(GeoPoint::new(lat, lon))?;
        let parent = self.parents.parent_of(&boundary.name);

        info!("Lookup ({:.4}, {:.4}) -> {} | {}", lat, lon, boundary.name, parent);

        Some(
            self.assembler
                .assemble(&boundary.name, boundary.number.as_deref(), parent),
        )
    }

    /// Case-insensitive boundary lookup, for rendering its shape
    pub fn boundary_geometry(&self, name: &str) -> Option<&Arc<Boundary>> {
        self.resolver.index().lookup(name)
    }

    pub fn known_names(&self) -> KnownNames {
        let mut boundaries: Vec<String> = self.index().names().map(str::to_string).collect();
        boundaries.sort();

        let mut parents = self.parents.parents().to_vec();
        parents.sort();

        KnownNames {
            boundaries,
            parents,
        }
    }

    /// Boundary names with no parent table entry
    pub fn unmapped_boundaries(&self) -> Vec<&str> {
        self.parents.unmapped(self.index().names())
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            boundaries: self.index().len(),
            boundary_records: self.assembler.boundary_records().len(),
            parent_records: self.assembler.parent_records().len(),
            loaded_at: self.loaded_at,
        }
    }

    pub fn index(&self) -> &BoundaryIndex {
        self.resolver.index()
    }
}

/// Holds the data store once it has been published.
///
/// Starts `Uninitialized`, becomes `Ready` on the first successful
/// [`publish`](StoreHandle::publish) and never goes back.
#[derive(Debug, Default)]
pub struct StoreHandle {
    store: OnceLock<DataStore>,
}

impl StoreHandle {
    pub fn uninitialized() -> Self {
        Self::default()
    }

    pub fn ready(store: DataStore) -> Self {
        Self {
            store: OnceLock::from(store),
        }
    }

    pub fn publish(&self, store: DataStore) -> Result<(), StoreError> {
        self.store
            .set(store)
            .map_err(|_| StoreError::AlreadyInitialized)?;
        info!("Data store published");
        Ok(())
    }

    pub fn get(&self) -> Result<&DataStore, StoreError> {
        self.store.get().ok_or(StoreError::Uninitialized)
    }
}
