//! Current user session
//!
//! At most one session exists at a time, persisted as a single blob under
//! one store key. The blob owns the user's collections: favorites,
//! watchlist, and reviews. No session means guest state.
//!
//! `login` always starts the blob with empty collections. Callers that
//! need to carry collections across a re-login must read them out first;
//! the profile-update path does exactly that by rewriting only the `user`
//! field of the existing blob.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collections::ListKind;
use crate::directory::{AuthError, ProfilePatch, UserDirectory};
use crate::models::{CatalogItem, Review, UserProfile};
use crate::storage::{keys, KvStore, StorageResult};

/// The persisted session blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    #[serde(default)]
    pub favorites: Vec<CatalogItem>,
    #[serde(default)]
    pub watchlist: Vec<CatalogItem>,
    /// Item-id keyed reviews
    #[serde(default)]
    pub reviews: BTreeMap<String, Review>,
    pub login_time: DateTime<Utc>,
}

impl Session {
    /// Start a fresh session for a user, collections empty
    pub fn new(user: UserProfile) -> Self {
        Self {
            user,
            favorites: Vec::new(),
            watchlist: Vec::new(),
            reviews: BTreeMap::new(),
            login_time: Utc::now(),
        }
    }

    pub fn list(&self, kind: ListKind) -> &Vec<CatalogItem> {
        match kind {
            ListKind::Favorites => &self.favorites,
            ListKind::Watchlist => &self.watchlist,
        }
    }

    pub fn list_mut(&mut self, kind: ListKind) -> &mut Vec<CatalogItem> {
        match kind {
            ListKind::Favorites => &mut self.favorites,
            ListKind::Watchlist => &mut self.watchlist,
        }
    }
}

/// Reads and writes the single persisted session
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: KvStore,
}

impl SessionStore {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Replace any existing session with a fresh one for this user
    ///
    /// Collections start empty; a previous session's lists are gone once
    /// this returns.
    pub fn login(&self, user: UserProfile) -> StorageResult<Session> {
        let session = Session::new(user);
        self.write(&session)?;
        Ok(session)
    }

    /// Clear the persisted session entirely
    pub fn logout(&self) -> StorageResult<()> {
        self.store.remove(keys::SESSION)
    }

    /// The current session, if a user is logged in
    ///
    /// A corrupt session blob reads as guest state.
    pub fn current(&self) -> Option<Session> {
        self.store.get_json(keys::SESSION)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current().is_some()
    }

    /// Merge a profile patch into the current session's user and into the
    /// matching directory entry
    ///
    /// The session's collections are preserved. Returns `false` when no
    /// session is active.
    pub fn update_profile(
        &self,
        directory: &UserDirectory,
        patch: &ProfilePatch,
    ) -> Result<bool, AuthError> {
        let Some(mut session) = self.current() else {
            return Ok(false);
        };

        patch.apply_to_profile(&mut session.user);
        directory.update_account(session.user.id, patch)?;
        self.write(&session)?;
        Ok(true)
    }

    /// Attach a review to an item; returns `false` in guest state
    pub fn add_review(&self, item_id: u64, review: Review) -> StorageResult<bool> {
        let Some(mut session) = self.current() else {
            return Ok(false);
        };

        session.reviews.insert(item_id.to_string(), review);
        self.write(&session)?;
        Ok(true)
    }

    /// The current user's reviews, empty for guests
    pub fn reviews(&self) -> BTreeMap<String, Review> {
        self.current().map(|s| s.reviews).unwrap_or_default()
    }

    /// Persist the whole session blob
    pub(crate) fn write(&self, session: &Session) -> StorageResult<()> {
        self.store.set_json(keys::SESSION, session)
    }
}
