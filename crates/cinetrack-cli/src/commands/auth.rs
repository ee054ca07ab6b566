//! Signup, login, and session command handlers

use anyhow::{Context, Result};

use cinetrack_core::{KvStore, NewAccount, SessionStore, UserDirectory};

use crate::output::Output;
use crate::prompt;

/// Create a local account and sign in
pub fn signup(
    store: &KvStore,
    username: String,
    email: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let (password, confirm_password) = match password {
        Some(p) => (p.clone(), p),
        None => (
            prompt::password("Password")?,
            prompt::password("Confirm password")?,
        ),
    };

    let directory = UserDirectory::new(store.clone());
    let profile = directory.register(&NewAccount {
        username,
        email,
        password,
        confirm_password,
    })?;

    // Auto-login after registration
    SessionStore::new(store.clone())
        .login(profile.clone())
        .context("Failed to start session")?;

    output.success(&format!("Account created. Signed in as {}", profile.username));
    Ok(())
}

/// Sign in with a username or email
pub fn login(
    store: &KvStore,
    identifier: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt::password("Password")?,
    };

    let directory = UserDirectory::new(store.clone());
    let profile = directory.authenticate(&identifier, &password)?;

    SessionStore::new(store.clone())
        .login(profile.clone())
        .context("Failed to start session")?;

    output.success(&format!("Signed in as {}", profile.username));
    Ok(())
}

/// Sign out and clear the session
pub fn logout(store: &KvStore, output: &Output) -> Result<()> {
    SessionStore::new(store.clone())
        .logout()
        .context("Failed to clear session")?;

    output.success("Signed out");
    Ok(())
}

/// Show the signed-in user
pub fn whoami(store: &KvStore, output: &Output) -> Result<()> {
    match SessionStore::new(store.clone()).current() {
        Some(session) => output.print_profile(&session.user),
        None => output.message("Not signed in (guest)"),
    }
    Ok(())
}
