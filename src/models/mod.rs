//! Core data models for the lookup service.

pub mod point;
pub mod representative;

pub use point::GeoPoint;
pub use representative::{RecordEntry, RepresentativeRecord, DATA_NOT_AVAILABLE, NO_PARTY};
