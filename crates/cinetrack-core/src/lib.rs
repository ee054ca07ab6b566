//! Cinetrack Core Library
//!
//! This crate provides the core functionality for cinetrack, a local-first
//! movie and TV library: accounts, a single-user session, favorites and
//! watchlist collections, search history, and preferences, all persisted
//! through one file-backed key-value store.
//!
//! # Architecture
//!
//! - **KvStore**: the sole source of truth, a local-storage-style JSON map
//! - Every component reads from it on demand and writes whole structures
//!   back on each mutation; there is no caching layer
//! - The catalog metadata service is an external collaborator, consumed
//!   through `catalog::CatalogClient`
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = KvStore::open(&config)?;
//!
//! let directory = UserDirectory::new(store.clone());
//! let profile = directory.authenticate("demo_user", "demo123")?;
//!
//! let sessions = SessionStore::new(store.clone());
//! sessions.login(profile)?;
//!
//! let library = CollectionManager::new(store);
//! library.toggle(ListKind::Favorites, item)?;
//! ```
//!
//! # Modules
//!
//! - `storage`: persistent key-value store and its keys
//! - `models`: catalog items, accounts, reviews
//! - `directory`: registered accounts, signup and login validation
//! - `session`: the current user and their owned collections
//! - `collections`: favorites/watchlist operations, export and import
//! - `history`: bounded search history
//! - `prefs`: theme, language, and view preferences
//! - `catalog`: client for the external metadata service
//! - `config`: application configuration

pub mod catalog;
pub mod collections;
pub mod config;
pub mod directory;
pub mod history;
pub mod models;
pub mod prefs;
pub mod session;
pub mod storage;

pub use catalog::{CatalogClient, CatalogError};
pub use collections::{
    CollectionError, CollectionManager, ImportMode, LibraryExport, ListKind, SortKey, Toggled,
};
pub use config::Config;
pub use directory::{AuthError, ExternalIdentity, NewAccount, ProfilePatch, UserDirectory};
pub use history::SearchHistoryStore;
pub use models::{Account, AuthProvider, CatalogItem, MediaKind, MovieItem, Review, SeriesItem, UserProfile};
pub use prefs::{Language, LibraryTab, PreferenceChange, PreferenceStore, Theme, ViewMode};
pub use session::{Session, SessionStore};
pub use storage::{KvStore, StorageError};
