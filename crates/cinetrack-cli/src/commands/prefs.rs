//! Preference command handlers

use anyhow::Result;

use cinetrack_core::{KvStore, Language, LibraryTab, PreferenceStore, Theme, ViewMode};

use crate::output::{Output, OutputFormat};

/// Show all preferences
pub fn show(store: &KvStore, output: &Output) -> Result<()> {
    let prefs = PreferenceStore::new(store.clone());

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "theme": prefs.theme().as_str(),
                    "language": prefs.language().code(),
                    "library_tab": prefs.library_tab().as_str(),
                    "library_view": prefs.library_view().as_str(),
                    "search_view": prefs.search_view().as_str(),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", prefs.theme().as_str());
            println!("{}", prefs.language().code());
        }
        OutputFormat::Human => {
            println!("Preferences:");
            println!("  theme:        {}", prefs.theme().as_str());
            println!("  language:     {}", prefs.language().code());
            println!("  library_tab:  {}", prefs.library_tab().as_str());
            println!("  library_view: {}", prefs.library_view().as_str());
            println!("  search_view:  {}", prefs.search_view().as_str());
        }
    }

    Ok(())
}

/// Set the color theme
pub fn set_theme(store: &KvStore, theme: Theme, output: &Output) -> Result<()> {
    PreferenceStore::new(store.clone()).set_theme(theme)?;
    output.success(&format!("Theme set to {}", theme.as_str()));
    Ok(())
}

/// Set the interface language
pub fn set_language(store: &KvStore, language: Language, output: &Output) -> Result<()> {
    PreferenceStore::new(store.clone()).set_language(language)?;
    output.success(&format!("Language set to {}", language.code()));
    Ok(())
}

/// Remember the selected library tab
pub fn set_library_tab(store: &KvStore, tab: LibraryTab, output: &Output) -> Result<()> {
    PreferenceStore::new(store.clone()).set_library_tab(tab)?;
    output.success(&format!("Library tab set to {}", tab.as_str()));
    Ok(())
}

/// Remember the library view mode
pub fn set_library_view(store: &KvStore, view: ViewMode, output: &Output) -> Result<()> {
    PreferenceStore::new(store.clone()).set_library_view(view)?;
    output.success(&format!("Library view set to {}", view.as_str()));
    Ok(())
}

/// Remember the search view mode
pub fn set_search_view(store: &KvStore, view: ViewMode, output: &Output) -> Result<()> {
    PreferenceStore::new(store.clone()).set_search_view(view)?;
    output.success(&format!("Search view set to {}", view.as_str()));
    Ok(())
}
