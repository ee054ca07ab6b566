//! Favorites and watchlist command handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use cinetrack_core::{
    CollectionManager, Config, ImportMode, KvStore, ListKind, MediaKind, SortKey,
};

use crate::net;
use crate::output::Output;
use crate::prompt;

/// Add an item to a list, fetching its full record first
pub async fn add(
    config: &Config,
    store: &KvStore,
    list_kind: ListKind,
    kind: MediaKind,
    id: u64,
    output: &Output,
) -> Result<()> {
    let manager = CollectionManager::new(store.clone());

    if manager.contains(list_kind, id) {
        output.message(&format!("Already in {}.", list_kind));
        return Ok(());
    }

    let item = net::fetch_detail(config, store, kind, id).await?;
    let title = item.display_title().to_string();
    manager.toggle(list_kind, item)?;

    output.success(&format!("Added {} to {}", title, list_kind));
    Ok(())
}

/// Toggle an item's membership in a list
pub async fn toggle(
    config: &Config,
    store: &KvStore,
    list_kind: ListKind,
    kind: MediaKind,
    id: u64,
    output: &Output,
) -> Result<()> {
    let manager = CollectionManager::new(store.clone());

    let item = net::fetch_detail(config, store, kind, id).await?;
    let title = item.display_title().to_string();
    let toggled = manager.toggle(list_kind, item)?;

    if toggled.added {
        output.success(&format!("Added {} to {}", title, list_kind));
    } else {
        output.success(&format!("Removed {} from {}", title, list_kind));
    }
    Ok(())
}

/// Remove an id from a list
pub fn remove(store: &KvStore, list_kind: ListKind, id: u64, output: &Output) -> Result<()> {
    let manager = CollectionManager::new(store.clone());
    manager.remove(list_kind, id)?;

    output.success(&format!("Removed {} from {}", id, list_kind));
    Ok(())
}

/// Print a list in its canonical order
pub fn list(store: &KvStore, list_kind: ListKind, output: &Output) -> Result<()> {
    let manager = CollectionManager::new(store.clone());
    output.print_items(&manager.items(list_kind));
    Ok(())
}

/// Empty a list after confirmation
pub fn clear(store: &KvStore, list_kind: ListKind, output: &Output) -> Result<()> {
    if output.should_prompt()
        && !prompt::confirm(&format!(
            "Remove every item from {}? This cannot be undone.",
            list_kind
        ))?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let manager = CollectionManager::new(store.clone());
    manager.clear(list_kind)?;

    output.success(&format!("Cleared {}", list_kind));
    Ok(())
}

/// Re-sort a list and persist the new canonical order
pub fn sort(store: &KvStore, list_kind: ListKind, key: SortKey, output: &Output) -> Result<()> {
    let manager = CollectionManager::new(store.clone());
    let sorted = manager.sort(list_kind, key)?;

    output.print_items(&sorted);
    Ok(())
}

/// Write both lists to a backup file
pub fn export(store: &KvStore, out: Option<PathBuf>, output: &Output) -> Result<()> {
    let manager = CollectionManager::new(store.clone());
    let snapshot = manager.export();

    let path = out.unwrap_or_else(|| {
        PathBuf::from(format!(
            "cinetrack-backup-{}.json",
            Utc::now().format("%Y-%m-%d")
        ))
    });

    let content =
        serde_json::to_string_pretty(&snapshot).context("Failed to serialize library export")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write export file: {:?}", path))?;

    output.success(&format!(
        "Exported {} favorite(s) and {} watchlist item(s) to {}",
        snapshot.favorites.len(),
        snapshot.watchlist.len(),
        path.display()
    ));
    Ok(())
}

/// Load a backup file into both lists
pub fn import(store: &KvStore, file: &Path, replace: bool, output: &Output) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {:?}", file))?;
    let snapshot: serde_json::Value =
        serde_json::from_str(&content).context("Import file is not valid JSON")?;

    let mode = if replace {
        ImportMode::Replace
    } else {
        ImportMode::Merge
    };

    if replace
        && output.should_prompt()
        && !prompt::confirm("Replace both lists with the imported data?")?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let manager = CollectionManager::new(store.clone());
    manager.import(&snapshot, mode)?;

    output.success("Library imported");
    Ok(())
}
