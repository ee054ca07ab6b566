//! Search history command handlers

use anyhow::Result;

use cinetrack_core::{KvStore, SearchHistoryStore};

use crate::output::Output;
use crate::prompt;

/// Print remembered queries, most recent first
pub fn list(store: &KvStore, output: &Output) -> Result<()> {
    let history = SearchHistoryStore::new(store.clone());
    output.print_history(&history.all());
    Ok(())
}

/// Forget every remembered query
pub fn clear(store: &KvStore, output: &Output) -> Result<()> {
    if output.should_prompt() && !prompt::confirm("Clear all search history?")? {
        println!("Cancelled.");
        return Ok(());
    }

    SearchHistoryStore::new(store.clone()).clear()?;
    output.success("Search history cleared");
    Ok(())
}
