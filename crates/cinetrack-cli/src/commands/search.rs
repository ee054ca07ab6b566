//! Search and discovery command handlers

use anyhow::Result;

use cinetrack_core::{CatalogClient, Config, KvStore, MediaKind, SearchHistoryStore};

use crate::net;
use crate::output::Output;

/// Search the catalog, recording the query in history
pub async fn search(config: &Config, store: &KvStore, query: String, output: &Output) -> Result<()> {
    SearchHistoryStore::new(store.clone()).record(&query)?;

    let language = net::preferred_language(store);
    let client = CatalogClient::new(config).map_err(|err| net::user_facing(err, language))?;
    let items = client
        .search(&query, language)
        .await
        .map_err(|err| net::user_facing(err, language))?;

    output.print_items(&items);
    Ok(())
}

/// Show the full record for one item
pub async fn show(
    config: &Config,
    store: &KvStore,
    kind: MediaKind,
    id: u64,
    output: &Output,
) -> Result<()> {
    let item = net::fetch_detail(config, store, kind, id).await?;
    output.print_item(&item);
    Ok(())
}

/// Show this week's trending movies and series
pub async fn trending(config: &Config, store: &KvStore, output: &Output) -> Result<()> {
    let language = net::preferred_language(store);
    let client = CatalogClient::new(config).map_err(|err| net::user_facing(err, language))?;
    let items = client
        .trending(language)
        .await
        .map_err(|err| net::user_facing(err, language))?;

    output.print_items(&items);
    Ok(())
}

/// List every genre the catalog knows, in the preferred locale
pub async fn genres(config: &Config, store: &KvStore, output: &Output) -> Result<()> {
    let language = net::preferred_language(store);
    let client = CatalogClient::new(config).map_err(|err| net::user_facing(err, language))?;
    let genres = client
        .genres(language)
        .await
        .map_err(|err| net::user_facing(err, language))?;

    if output.is_json() {
        println!("{}", serde_json::to_string_pretty(&genres)?);
    } else {
        for genre in &genres {
            println!("{:>6}  {}", genre.id, genre.name);
        }
    }
    Ok(())
}
