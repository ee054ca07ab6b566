//! Favorites and watchlist management
//!
//! Both lists live inside the session blob and behave as id-keyed sets
//! stored in insertion order. Membership is independent between the two
//! lists; an item may sit in both. Every mutation re-reads the session,
//! edits it, and writes the whole blob back.
//!
//! Mutations require an active session. Guest callers get `AuthRequired`
//! and no state change; the front end is expected to redirect to login.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CatalogItem;
use crate::session::SessionStore;
use crate::storage::{KvStore, StorageError};

/// Which of the two session-owned lists to operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Favorites,
    Watchlist,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Favorites => f.write_str("favorites"),
            ListKind::Watchlist => f.write_str("watchlist"),
        }
    }
}

/// Sort orders for a list
///
/// String forms match the sort selector values of the original interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateDesc,
    DateAsc,
    RatingDesc,
    RatingAsc,
    TitleAsc,
    TitleDesc,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(SortKey::DateDesc),
            "date-asc" => Ok(SortKey::DateAsc),
            "rating-desc" => Ok(SortKey::RatingDesc),
            "rating-asc" => Ok(SortKey::RatingAsc),
            "title-asc" => Ok(SortKey::TitleAsc),
            "title-desc" => Ok(SortKey::TitleDesc),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// Result of a toggle: whether the item ended up in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    pub added: bool,
}

/// Errors surfaced by collection operations
#[derive(Error, Debug)]
pub enum CollectionError {
    /// A mutation was attempted in guest state
    #[error("Sign in to manage your library")]
    AuthRequired,

    /// An import snapshot was missing a required list
    #[error("Import data is missing the favorites or watchlist list")]
    MalformedImport,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The downloadable library snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryExport {
    pub favorites: Vec<CatalogItem>,
    pub watchlist: Vec<CatalogItem>,
    pub export_date: chrono::DateTime<chrono::Utc>,
    /// Owning username, or "unknown" in guest state
    pub user: String,
}

/// Import snapshot: both lists are required; anything else is malformed
#[derive(Debug, Deserialize)]
struct LibrarySnapshot {
    favorites: Vec<CatalogItem>,
    watchlist: Vec<CatalogItem>,
}

/// Whether an import overwrites or unions into the existing lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Overwrite both lists wholesale
    Replace,
    /// Append only ids not already present; existing entries win
    Merge,
}

/// Add/remove/sort/import operations over the session's lists
#[derive(Debug, Clone)]
pub struct CollectionManager {
    sessions: SessionStore,
}

impl CollectionManager {
    pub fn new(store: KvStore) -> Self {
        Self {
            sessions: SessionStore::new(store),
        }
    }

    /// Add the item if absent, remove it if present, keyed by id alone
    pub fn toggle(&self, kind: ListKind, item: CatalogItem) -> Result<Toggled, CollectionError> {
        let mut session = self.sessions.current().ok_or(CollectionError::AuthRequired)?;

        let list = session.list_mut(kind);
        let added = match list.iter().position(|existing| existing.id() == item.id()) {
            Some(pos) => {
                list.remove(pos);
                false
            }
            None => {
                list.push(item);
                true
            }
        };

        self.sessions.write(&session)?;
        Ok(Toggled { added })
    }

    /// Remove an id from a list; removing an absent id is a no-op
    pub fn remove(&self, kind: ListKind, item_id: u64) -> Result<(), CollectionError> {
        let mut session = self.sessions.current().ok_or(CollectionError::AuthRequired)?;

        session.list_mut(kind).retain(|item| item.id() != item_id);
        self.sessions.write(&session)?;
        Ok(())
    }

    /// Empty a list unconditionally
    ///
    /// Any confirmation belongs at the interface boundary, not here.
    pub fn clear(&self, kind: ListKind) -> Result<(), CollectionError> {
        let mut session = self.sessions.current().ok_or(CollectionError::AuthRequired)?;

        session.list_mut(kind).clear();
        self.sessions.write(&session)?;
        Ok(())
    }

    /// The items of a list in canonical order, empty for guests
    pub fn items(&self, kind: ListKind) -> Vec<CatalogItem> {
        self.sessions
            .current()
            .map(|session| session.list(kind).clone())
            .unwrap_or_default()
    }

    /// Whether a list contains the id
    pub fn contains(&self, kind: ListKind, item_id: u64) -> bool {
        self.sessions
            .current()
            .map(|session| session.list(kind).iter().any(|item| item.id() == item_id))
            .unwrap_or(false)
    }

    /// Stable-sort a list and persist the result as its canonical order
    pub fn sort(&self, kind: ListKind, key: SortKey) -> Result<Vec<CatalogItem>, CollectionError> {
        let mut session = self.sessions.current().ok_or(CollectionError::AuthRequired)?;

        let list = session.list_mut(kind);
        sort_items(list, key);
        let sorted = list.clone();

        self.sessions.write(&session)?;
        Ok(sorted)
    }

    /// Snapshot both lists for download
    ///
    /// Works in guest state too: the lists are empty and the user is
    /// "unknown".
    pub fn export(&self) -> LibraryExport {
        let session = self.sessions.current();
        LibraryExport {
            favorites: session
                .as_ref()
                .map(|s| s.favorites.clone())
                .unwrap_or_default(),
            watchlist: session
                .as_ref()
                .map(|s| s.watchlist.clone())
                .unwrap_or_default(),
            export_date: chrono::Utc::now(),
            user: session
                .map(|s| s.user.username)
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    /// Load a snapshot into the session's lists
    ///
    /// A snapshot missing either list is rejected with no state change.
    pub fn import(
        &self,
        snapshot: &serde_json::Value,
        mode: ImportMode,
    ) -> Result<(), CollectionError> {
        let mut session = self.sessions.current().ok_or(CollectionError::AuthRequired)?;

        let snapshot: LibrarySnapshot = serde_json::from_value(snapshot.clone())
            .map_err(|_| CollectionError::MalformedImport)?;

        match mode {
            ImportMode::Replace => {
                session.favorites = snapshot.favorites;
                session.watchlist = snapshot.watchlist;
            }
            ImportMode::Merge => {
                merge_into(&mut session.favorites, snapshot.favorites);
                merge_into(&mut session.watchlist, snapshot.watchlist);
            }
        }

        self.sessions.write(&session)?;
        Ok(())
    }
}

/// First-wins union: append only ids not already present
fn merge_into(existing: &mut Vec<CatalogItem>, incoming: Vec<CatalogItem>) {
    for item in incoming {
        if !existing.iter().any(|e| e.id() == item.id()) {
            existing.push(item);
        }
    }
}

/// Stable in-place sort by the given key
fn sort_items(items: &mut [CatalogItem], key: SortKey) {
    // Missing dates compare as epoch zero, missing ratings as 0
    let date = |item: &CatalogItem| item.air_date().unwrap_or_else(NaiveDate::default);
    let rating = |item: &CatalogItem| item.rating().unwrap_or(0.0);
    let title = |item: &CatalogItem| item.display_title().to_lowercase();

    match key {
        SortKey::DateDesc => items.sort_by(|a, b| date(b).cmp(&date(a))),
        SortKey::DateAsc => items.sort_by(|a, b| date(a).cmp(&date(b))),
        SortKey::RatingDesc => items.sort_by(|a, b| rating(b).total_cmp(&rating(a))),
        SortKey::RatingAsc => items.sort_by(|a, b| rating(a).total_cmp(&rating(b))),
        SortKey::TitleAsc => items.sort_by(|a, b| title(a).cmp(&title(b))),
        SortKey::TitleDesc => items.sort_by(|a, b| title(b).cmp(&title(a))),
    }
}
