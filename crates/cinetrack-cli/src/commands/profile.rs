//! Profile command handlers

use anyhow::{bail, Result};

use cinetrack_core::{KvStore, ProfilePatch, SessionStore, UserDirectory};

use crate::output::Output;
use crate::prompt;

/// Merge profile fields into the session and the directory
pub fn update(
    store: &KvStore,
    display_name: Option<String>,
    avatar: Option<String>,
    output: &Output,
) -> Result<()> {
    let patch = ProfilePatch {
        display_name,
        avatar,
    };
    if patch.is_empty() {
        bail!("Nothing to update. Pass --display-name or --avatar.");
    }

    let directory = UserDirectory::new(store.clone());
    let sessions = SessionStore::new(store.clone());

    if !sessions.update_profile(&directory, &patch)? {
        bail!("Not signed in. Run `cinetrack login` first.");
    }

    output.success("Profile updated");
    Ok(())
}

/// Change the signed-in user's password
pub fn password(store: &KvStore, output: &Output) -> Result<()> {
    let sessions = SessionStore::new(store.clone());
    let Some(session) = sessions.current() else {
        bail!("Not signed in. Run `cinetrack login` first.");
    };

    let current = prompt::password("Current password")?;
    let new = prompt::password("New password")?;

    let directory = UserDirectory::new(store.clone());
    if !directory.change_password(session.user.id, &current, &new)? {
        bail!("Current password is incorrect.");
    }

    output.success("Password changed");
    Ok(())
}
