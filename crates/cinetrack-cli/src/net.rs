//! Catalog fetch helpers
//!
//! One place to build the client, pick the preferred locale, and turn a
//! catalog failure into the user-facing message. Network failures never
//! reach the stored state; they stop the command here.

use anyhow::{anyhow, Result};
use tracing::debug;

use cinetrack_core::{
    CatalogClient, CatalogError, CatalogItem, Config, KvStore, Language, MediaKind,
    PreferenceStore,
};

/// The preferred catalog locale from persisted preferences
pub fn preferred_language(store: &KvStore) -> Language {
    PreferenceStore::new(store.clone()).language()
}

/// Fetch the full record for one item in the preferred locale
pub async fn fetch_detail(config: &Config, store: &KvStore, kind: MediaKind, id: u64) -> Result<CatalogItem> {
    let language = preferred_language(store);
    let client = CatalogClient::new(config).map_err(|err| user_facing(err, language))?;
    client
        .detail(kind, id, language)
        .await
        .map_err(|err| user_facing(err, language))
}

/// Convert a catalog error into the localized user-visible message
pub fn user_facing(err: CatalogError, language: Language) -> anyhow::Error {
    debug!(%err, "catalog request failed");
    anyhow!("{}", fetch_failed_message(language))
}

/// The fetch-failure message in the preferred interface language
fn fetch_failed_message(language: Language) -> &'static str {
    match language {
        Language::English => "Failed to fetch data. Please try again later.",
        Language::Arabic => "فشل في جلب البيانات. يرجى المحاولة مرة أخرى في وقت لاحق.",
    }
}
