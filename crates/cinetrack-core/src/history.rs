//! Search history
//!
//! A bounded, de-duplicated list of past search terms, most recent first.
//! Queries are compared exactly as typed; a re-issued query moves to the
//! front instead of duplicating.

use crate::storage::{keys, KvStore, StorageResult};

/// Maximum number of remembered queries
const HISTORY_LIMIT: usize = 20;

/// Queries shorter than this (after trimming) are not recorded
const MIN_QUERY_LEN: usize = 2;

/// Persisted list of recent search queries
#[derive(Debug, Clone)]
pub struct SearchHistoryStore {
    store: KvStore,
}

impl SearchHistoryStore {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Record a query at the front of the history
    ///
    /// Too-short queries are ignored. An existing equal entry is moved to
    /// the front, and the list is trimmed to the cap after every insert.
    pub fn record(&self, query: &str) -> StorageResult<()> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Ok(());
        }

        let mut history = self.all();
        history.retain(|entry| entry != trimmed);
        history.insert(0, trimmed.to_string());
        history.truncate(HISTORY_LIMIT);

        self.store.set_json(keys::SEARCH_HISTORY, &history)
    }

    /// Every remembered query, most recent first
    pub fn all(&self) -> Vec<String> {
        self.store
            .get_json(keys::SEARCH_HISTORY)
            .unwrap_or_default()
    }

    /// The `n` most recent queries
    pub fn recent(&self, n: usize) -> Vec<String> {
        let mut history = self.all();
        history.truncate(n);
        history
    }

    /// Forget everything
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(keys::SEARCH_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_history(temp_dir: &TempDir) -> SearchHistoryStore {
        SearchHistoryStore::new(KvStore::new(temp_dir.path().join("store.json")))
    }

    #[test]
    fn test_empty_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let history = test_history(&temp_dir);

        assert!(history.all().is_empty());
        assert!(history.recent(5).is_empty());
    }

    #[test]
    fn test_record_most_recent_first() {
        let temp_dir = TempDir::new().unwrap();
        let history = test_history(&temp_dir);

        history.record("batman").unwrap();
        history.record("dune").unwrap();

        assert_eq!(history.all(), vec!["dune", "batman"]);
    }

    #[test]
    fn test_case_sensitive_distinct_entries() {
        let temp_dir = TempDir::new().unwrap();
        let history = test_history(&temp_dir);

        history.record("batman").unwrap();
        history.record("Batman").unwrap();

        // Distinct strings: both present, most recent first
        assert_eq!(history.all(), vec!["Batman", "batman"]);

        // Re-recording moves the original to the front without duplicating
        history.record("batman").unwrap();
        assert_eq!(history.all(), vec!["batman", "Batman"]);
    }

    #[test]
    fn test_short_queries_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let history = test_history(&temp_dir);

        history.record("a").unwrap();
        history.record("  z  ").unwrap();
        history.record("").unwrap();

        assert!(history.all().is_empty());
    }

    #[test]
    fn test_query_is_trimmed() {
        let temp_dir = TempDir::new().unwrap();
        let history = test_history(&temp_dir);

        history.record("  dune  ").unwrap();
        assert_eq!(history.all(), vec!["dune"]);

        // The trimmed form matches the stored entry
        history.record("dune").unwrap();
        assert_eq!(history.all(), vec!["dune"]);
    }

    #[test]
    fn test_capped_at_limit() {
        let temp_dir = TempDir::new().unwrap();
        let history = test_history(&temp_dir);

        for i in 0..25 {
            history.record(&format!("query {}", i)).unwrap();
        }

        let all = history.all();
        assert_eq!(all.len(), 20);
        assert_eq!(all[0], "query 24");
        // The oldest entries fell off
        assert!(!all.contains(&"query 0".to_string()));
        assert!(!all.contains(&"query 4".to_string()));
    }

    #[test]
    fn test_recent_limits_output() {
        let temp_dir = TempDir::new().unwrap();
        let history = test_history(&temp_dir);

        for query in ["one 1", "two 2", "three 3"] {
            history.record(query).unwrap();
        }

        assert_eq!(history.recent(2), vec!["three 3", "two 2"]);
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let history = test_history(&temp_dir);

        history.record("batman").unwrap();
        history.clear().unwrap();

        assert!(history.all().is_empty());
    }
}
