//! User preferences
//!
//! Theme and language are process-wide, persisted independently of the
//! session, and survive logout. Setting either one notifies a synchronous
//! observer list so interested parties can re-render or re-fetch
//! locale-specific data. Notification is fire-and-forget: no registry
//! handles, no queuing, no delivery guarantees.
//!
//! The per-page view preferences (library tab, view modes) persist through
//! the same store but do not broadcast.

use crate::storage::{keys, KvStore, StorageResult};

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Interface language
///
/// Arabic is the primary locale and the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Arabic,
    English,
}

impl Language {
    /// Short code, the persisted form
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    /// Locale string sent to the catalog service
    pub fn api_locale(&self) -> &'static str {
        match self {
            Language::Arabic => "ar-SA",
            Language::English => "en-US",
        }
    }

    pub fn toggled(&self) -> Language {
        match self {
            Language::Arabic => Language::English,
            Language::English => Language::Arabic,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ar" | "arabic" => Ok(Language::Arabic),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unknown language: {}", other)),
        }
    }
}

/// Library page tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryTab {
    #[default]
    Favorites,
    Watchlist,
}

impl LibraryTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryTab::Favorites => "favorites",
            LibraryTab::Watchlist => "watchlist",
        }
    }
}

impl std::str::FromStr for LibraryTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "favorites" => Ok(LibraryTab::Favorites),
            "watchlist" => Ok(LibraryTab::Watchlist),
            other => Err(format!("unknown tab: {}", other)),
        }
    }
}

/// Grid or list rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode: {}", other)),
        }
    }
}

/// A broadcast preference change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    Theme(Theme),
    Language(Language),
}

/// Observer callback invoked synchronously on theme/language changes
pub type Observer = Box<dyn Fn(&PreferenceChange) + Send + Sync>;

/// Persisted theme, language, and view preferences
pub struct PreferenceStore {
    store: KvStore,
    observers: Vec<Observer>,
}

impl PreferenceStore {
    pub fn new(store: KvStore) -> Self {
        Self {
            store,
            observers: Vec::new(),
        }
    }

    /// Register an observer for theme and language changes
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    pub fn theme(&self) -> Theme {
        self.parse_or_default(keys::THEME)
    }

    pub fn set_theme(&self, theme: Theme) -> StorageResult<()> {
        self.store.set(keys::THEME, theme.as_str())?;
        self.notify(PreferenceChange::Theme(theme));
        Ok(())
    }

    pub fn language(&self) -> Language {
        self.parse_or_default(keys::LANGUAGE)
    }

    pub fn set_language(&self, language: Language) -> StorageResult<()> {
        self.store.set(keys::LANGUAGE, language.code())?;
        self.notify(PreferenceChange::Language(language));
        Ok(())
    }

    pub fn library_tab(&self) -> LibraryTab {
        self.parse_or_default(keys::LIBRARY_TAB)
    }

    pub fn set_library_tab(&self, tab: LibraryTab) -> StorageResult<()> {
        self.store.set(keys::LIBRARY_TAB, tab.as_str())
    }

    pub fn library_view(&self) -> ViewMode {
        self.parse_or_default(keys::LIBRARY_VIEW)
    }

    pub fn set_library_view(&self, view: ViewMode) -> StorageResult<()> {
        self.store.set(keys::LIBRARY_VIEW, view.as_str())
    }

    pub fn search_view(&self) -> ViewMode {
        self.parse_or_default(keys::SEARCH_VIEW)
    }

    pub fn set_search_view(&self, view: ViewMode) -> StorageResult<()> {
        self.store.set(keys::SEARCH_VIEW, view.as_str())
    }

    /// Read a preference, falling back to its default when absent or
    /// unrecognized
    fn parse_or_default<T>(&self, key: &str) -> T
    where
        T: std::str::FromStr + Default,
    {
        self.store
            .get(key)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    fn notify(&self, change: PreferenceChange) {
        for observer in &self.observers {
            observer(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_prefs(temp_dir: &TempDir) -> PreferenceStore {
        PreferenceStore::new(KvStore::new(temp_dir.path().join("store.json")))
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = test_prefs(&temp_dir);

        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.language(), Language::Arabic);
        assert_eq!(prefs.library_tab(), LibraryTab::Favorites);
        assert_eq!(prefs.library_view(), ViewMode::Grid);
        assert_eq!(prefs.search_view(), ViewMode::Grid);
    }

    #[test]
    fn test_set_and_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        {
            let prefs = PreferenceStore::new(KvStore::new(&path));
            prefs.set_theme(Theme::Light).unwrap();
            prefs.set_language(Language::English).unwrap();
            prefs.set_library_tab(LibraryTab::Watchlist).unwrap();
            prefs.set_library_view(ViewMode::List).unwrap();
        }

        // Values survive a reopen
        let prefs = PreferenceStore::new(KvStore::new(&path));
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(prefs.language(), Language::English);
        assert_eq!(prefs.library_tab(), LibraryTab::Watchlist);
        assert_eq!(prefs.library_view(), ViewMode::List);
    }

    #[test]
    fn test_unrecognized_value_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::new(temp_dir.path().join("store.json"));
        store.set(keys::THEME, "sepia").unwrap();

        let prefs = PreferenceStore::new(store);
        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[test]
    fn test_observers_notified_on_theme_and_language() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = test_prefs(&temp_dir);

        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        prefs.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        prefs.set_theme(Theme::Light).unwrap();
        prefs.set_language(Language::English).unwrap();
        // View preferences do not broadcast
        prefs.set_library_view(ViewMode::List).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_observer_receives_change_payload() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = test_prefs(&temp_dir);

        let last = Arc::new(std::sync::Mutex::new(None));
        let sink = last.clone();
        prefs.subscribe(Box::new(move |change| {
            *sink.lock().unwrap() = Some(*change);
        }));

        prefs.set_language(Language::English).unwrap();
        assert_eq!(
            *last.lock().unwrap(),
            Some(PreferenceChange::Language(Language::English))
        );
    }

    #[test]
    fn test_toggles() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Language::Arabic.toggled(), Language::English);
        assert_eq!(Language::English.api_locale(), "en-US");
        assert_eq!(Language::Arabic.api_locale(), "ar-SA");
    }

    #[test]
    fn test_preferences_survive_logout() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::new(temp_dir.path().join("store.json"));

        let prefs = PreferenceStore::new(store.clone());
        prefs.set_theme(Theme::Light).unwrap();

        // Session removal leaves preference keys alone
        store.remove(keys::SESSION).unwrap();
        assert_eq!(prefs.theme(), Theme::Light);
    }
}
