//! cinetrack CLI
//!
//! Command-line interface for cinetrack - a local-first movie and TV
//! library over the catalog metadata service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cinetrack_core::{
    Config, KvStore, Language, LibraryTab, ListKind, MediaKind, SortKey, Theme, ViewMode,
};

mod commands;
mod net;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "cinetrack")]
#[command(about = "cinetrack - Local-first movie and TV library")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a local account and sign in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign in with a username or email
    Login {
        /// Username or email
        identifier: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and clear the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage the signed-in user's profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Manage favorites
    #[command(alias = "fav")]
    Favorites {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Manage the watchlist
    #[command(alias = "wl")]
    Watchlist {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Export or import both lists
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },
    /// Search the catalog
    Search {
        /// Search query (recorded in history)
        query: String,
    },
    /// Show details for one item
    Show { kind: MediaKind, id: u64 },
    /// Show this week's trending movies and series
    Trending,
    /// List catalog genres
    Genres,
    /// Show or clear search history
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show or set preferences
    Prefs {
        #[command(subcommand)]
        command: Option<PrefsCommands>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Update profile fields
    Update {
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Change the account password
    Password,
}

#[derive(Subcommand)]
enum ListCommands {
    /// Add an item by kind (movie|tv) and catalog id
    Add { kind: MediaKind, id: u64 },
    /// Toggle an item's membership
    Toggle { kind: MediaKind, id: u64 },
    /// Remove an item by catalog id
    #[command(alias = "rm")]
    Remove { id: u64 },
    /// Show the list in its canonical order
    #[command(alias = "ls")]
    List,
    /// Remove every item
    Clear,
    /// Re-sort and persist the new order
    Sort {
        /// One of: date-desc, date-asc, rating-desc, rating-asc,
        /// title-asc, title-desc
        key: SortKey,
    },
}

#[derive(Subcommand)]
enum LibraryCommands {
    /// Write both lists to a backup file
    Export {
        /// Output path (default: cinetrack-backup-<date>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load a backup file into both lists
    Import {
        file: PathBuf,
        /// Overwrite both lists instead of merging
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Show remembered queries, most recent first
    #[command(alias = "ls")]
    List,
    /// Forget every remembered query
    Clear,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, api_key, api_base_url)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Show all preferences
    Show,
    /// Set the color theme (dark|light)
    Theme { value: Theme },
    /// Set the interface language (ar|en)
    Language { value: Language },
    /// Remember the selected library tab (favorites|watchlist)
    Tab { value: LibraryTab },
    /// Remember the library view mode (grid|list)
    LibraryView { value: ViewMode },
    /// Remember the search view mode (grid|list)
    SearchView { value: ViewMode },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load().context("Failed to load configuration")?;
    let store = KvStore::open(&config).context("Failed to open store")?;

    match cli.command {
        Commands::Signup {
            username,
            email,
            password,
        } => commands::auth::signup(&store, username, email, password, &output),
        Commands::Login {
            identifier,
            password,
        } => commands::auth::login(&store, identifier, password, &output),
        Commands::Logout => commands::auth::logout(&store, &output),
        Commands::Whoami => commands::auth::whoami(&store, &output),
        Commands::Profile { command } => handle_profile_command(command, &store, &output),
        Commands::Favorites { command } => {
            handle_list_command(command, ListKind::Favorites, &config, &store, &output).await
        }
        Commands::Watchlist { command } => {
            handle_list_command(command, ListKind::Watchlist, &config, &store, &output).await
        }
        Commands::Library { command } => handle_library_command(command, &store, &output),
        Commands::Search { query } => {
            commands::search::search(&config, &store, query, &output).await
        }
        Commands::Show { kind, id } => {
            commands::search::show(&config, &store, kind, id, &output).await
        }
        Commands::Trending => commands::search::trending(&config, &store, &output).await,
        Commands::Genres => commands::search::genres(&config, &store, &output).await,
        Commands::History { command } => handle_history_command(command, &store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Prefs { command } => handle_prefs_command(command, &store, &output),
    }
}

fn handle_profile_command(
    command: ProfileCommands,
    store: &KvStore,
    output: &Output,
) -> Result<()> {
    match command {
        ProfileCommands::Update {
            display_name,
            avatar,
        } => commands::profile::update(store, display_name, avatar, output),
        ProfileCommands::Password => commands::profile::password(store, output),
    }
}

async fn handle_list_command(
    command: ListCommands,
    list_kind: ListKind,
    config: &Config,
    store: &KvStore,
    output: &Output,
) -> Result<()> {
    match command {
        ListCommands::Add { kind, id } => {
            commands::library::add(config, store, list_kind, kind, id, output).await
        }
        ListCommands::Toggle { kind, id } => {
            commands::library::toggle(config, store, list_kind, kind, id, output).await
        }
        ListCommands::Remove { id } => commands::library::remove(store, list_kind, id, output),
        ListCommands::List => commands::library::list(store, list_kind, output),
        ListCommands::Clear => commands::library::clear(store, list_kind, output),
        ListCommands::Sort { key } => commands::library::sort(store, list_kind, key, output),
    }
}

fn handle_library_command(
    command: LibraryCommands,
    store: &KvStore,
    output: &Output,
) -> Result<()> {
    match command {
        LibraryCommands::Export { out } => commands::library::export(store, out, output),
        LibraryCommands::Import { file, replace } => {
            commands::library::import(store, &file, replace, output)
        }
    }
}

fn handle_history_command(
    command: Option<HistoryCommands>,
    store: &KvStore,
    output: &Output,
) -> Result<()> {
    match command {
        Some(HistoryCommands::List) | None => commands::history::list(store, output),
        Some(HistoryCommands::Clear) => commands::history::clear(store, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

fn handle_prefs_command(
    command: Option<PrefsCommands>,
    store: &KvStore,
    output: &Output,
) -> Result<()> {
    match command {
        Some(PrefsCommands::Show) | None => commands::prefs::show(store, output),
        Some(PrefsCommands::Theme { value }) => commands::prefs::set_theme(store, value, output),
        Some(PrefsCommands::Language { value }) => {
            commands::prefs::set_language(store, value, output)
        }
        Some(PrefsCommands::Tab { value }) => {
            commands::prefs::set_library_tab(store, value, output)
        }
        Some(PrefsCommands::LibraryView { value }) => {
            commands::prefs::set_library_view(store, value, output)
        }
        Some(PrefsCommands::SearchView { value }) => {
            commands::prefs::set_search_view(store, value, output)
        }
    }
}
