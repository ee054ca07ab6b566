//! Catalog collaborator boundary
//!
//! The metadata service is consumed, never implemented. Wire shapes are
//! resolved into the `CatalogItem` union here; the rest of the crate only
//! ever sees resolved items.

mod client;
pub mod models;

pub use client::{CatalogClient, CatalogError};
pub use models::Genre;
