//! Persistent store keys
//!
//! One key per concern. Writers always serialize the entire structure for
//! a key; there are no partial writes.

/// Session blob: current user plus their owned collections
pub const SESSION: &str = "user-session";

/// Registered account directory
pub const DIRECTORY: &str = "user-directory";

/// Recent search queries, most recent first
pub const SEARCH_HISTORY: &str = "search-history";

/// Color theme preference
pub const THEME: &str = "theme";

/// Interface language preference
pub const LANGUAGE: &str = "language";

/// Last selected library tab
pub const LIBRARY_TAB: &str = "library-tab";

/// Library page view mode
pub const LIBRARY_VIEW: &str = "library-view";

/// Search page view mode
pub const SEARCH_VIEW: &str = "search-view";
