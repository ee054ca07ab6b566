//! Persistence layer
//!
//! The key-value store is the sole source of truth for all user state.
//! Every other component reads from it on demand and writes back whole
//! structures on every mutation.

pub mod error;
pub mod keys;
mod kv;

pub use error::{StorageError, StorageResult};
pub use kv::KvStore;
