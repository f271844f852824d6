//! Loads boundaries and representative records from disk.
//!
//! Runs once at startup; the result is published through
//! [`StoreHandle`](crate::store::StoreHandle) and never touched again.

pub mod geojson;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

use crate::config::DataConfig;
use crate::models::RecordEntry;
use crate::parent::ParentMapper;
use crate::pip::{BoundaryIndex, SkippedBoundary};
use crate::records::{RecordAssembler, RecordStore};
use crate::store::DataStore;

use self::geojson::FeatureCollection;

/// What was left out while loading
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Boundaries dropped for unsupported or malformed geometry
    pub skipped: Vec<SkippedBoundary>,
    /// Features without a name property
    pub unnamed: usize,
    /// Loaded boundaries with no parent table entry
    pub unmapped: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.unnamed == 0 && self.unmapped.is_empty()
    }
}

/// Load and index the boundary GeoJSON FeatureCollection
pub fn load_boundaries(path: &Path) -> Result<(BoundaryIndex, Vec<SkippedBoundary>, usize)> {
    info!("Loading boundaries from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open boundary file {}", path.display()))?;
    let collection: FeatureCollection = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse GeoJSON in {}", path.display()))?;

    info!("Loaded {} features from {}", collection.features.len(), path.display());

    let (candidates, unnamed) = collection.into_candidates();
    let (index, skipped) = BoundaryIndex::build_from_candidates(candidates);
    Ok((index, skipped, unnamed))
}

/// Load a `{name: record}` JSON file. A missing file yields an empty store
/// so lookups fall back to placeholder records.
pub fn load_record_store(path: &Path) -> Result<RecordStore> {
    if !path.exists() {
        warn!("Record file not found: {}", path.display());
        return Ok(RecordStore::default());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open record file {}", path.display()))?;
    let entries: HashMap<String, RecordEntry> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse records in {}", path.display()))?;

    info!("Loaded {} records from {}", entries.len(), path.display());
    Ok(entries.into_iter().collect())
}

/// Load everything and assemble the data store.
pub fn load_data_store(config: &DataConfig, parents: ParentMapper) -> Result<(DataStore, LoadReport)> {
    let (index, skipped, unnamed) = load_boundaries(&config.boundaries)?;
    let boundary_records = load_record_store(&config.boundary_records)?;
    let parent_records = load_record_store(&config.parent_records)?;

    let unmapped: Vec<String> = parents
        .unmapped(index.names())
        .into_iter()
        .map(str::to_string)
        .collect();
    for name in &unmapped {
        warn!("Boundary '{}' has no parent mapping", name);
    }

    let store = DataStore::new(
        index,
        parents,
        RecordAssembler::new(boundary_records, parent_records),
    );

    let stats = store.stats();
    info!(
        "Data store ready: {} boundaries, {} boundary records, {} parent records",
        stats.boundaries, stats.boundary_records, stats.parent_records
    );

    Ok((
        store,
        LoadReport {
            skipped,
            unnamed,
            unmapped,
        },
    ))
}
