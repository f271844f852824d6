//! Constituency - resolves a coordinate to its assembly constituency,
//! parliamentary constituency and elected representatives.
//!
//! This library provides the shared types and modules for the serve and
//! check binaries.

pub mod config;
pub mod loader;
pub mod models;
pub mod parent;
pub mod pip;
pub mod records;
pub mod store;

pub use models::{GeoPoint, RepresentativeRecord};
pub use parent::{ParentMapper, ParentName};
pub use records::{RecordAssembler, RecordStore, Resolution};
pub use store::{DataStore, StoreError, StoreHandle};
