//! Registered account directory
//!
//! The directory is the full list of local accounts, persisted as one JSON
//! array under a single store key. An empty or unreadable directory is
//! reseeded with two fixed demo accounts so login can be demonstrated
//! without a prior signup.
//!
//! Credentials are stored and compared in cleartext. That matches the
//! system this reproduces and is load-bearing for the authentication
//! semantics; hashing would be a behavior change, not a drop-in fix.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{default_avatar, Account, AuthProvider, UserProfile};
use crate::storage::{keys, KvStore, StorageError};

/// Minimum username length accepted at signup
const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length accepted at signup
const MIN_PASSWORD_LEN: usize = 6;

/// Errors surfaced by directory operations
#[derive(Error, Debug)]
pub enum AuthError {
    /// One or more signup fields failed validation; the messages are
    /// user-facing and reported together
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// No account matched the identifier/credential pair
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Signup form fields
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Identity asserted by an external provider callback
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalIdentity {
    /// Provider subject, stable across logins
    pub provider_id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// The set of registered local accounts
#[derive(Debug, Clone)]
pub struct UserDirectory {
    store: KvStore,
}

impl UserDirectory {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// All registered accounts, seeding the demo accounts when the
    /// directory is missing, empty, or unreadable
    pub fn accounts(&self) -> Vec<Account> {
        match self.store.get_json::<Vec<Account>>(keys::DIRECTORY) {
            Some(accounts) if !accounts.is_empty() => accounts,
            _ => self.seed(),
        }
    }

    /// Find an account by id
    pub fn find(&self, account_id: i64) -> Option<Account> {
        self.accounts().into_iter().find(|a| a.id == account_id)
    }

    /// Register a new local account
    ///
    /// Validates every field and reports all failures at once. On success
    /// the account is appended, the whole directory persisted, and the
    /// credential-stripped profile returned for session use.
    pub fn register(&self, candidate: &NewAccount) -> Result<UserProfile, AuthError> {
        let mut accounts = self.accounts();
        let mut errors = Vec::new();

        if candidate.username.chars().count() < MIN_USERNAME_LEN {
            errors.push("Username must be at least 3 characters".to_string());
        }

        if !is_valid_email(&candidate.email) {
            errors.push("Please enter a valid email address".to_string());
        }

        if candidate.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push("Password must be at least 6 characters".to_string());
        }

        if candidate.password != candidate.confirm_password {
            errors.push("Passwords do not match".to_string());
        }

        // A collision on either field rejects the signup
        if accounts
            .iter()
            .any(|a| a.username == candidate.username || a.email == candidate.email)
        {
            errors.push("Username or email is already in use".to_string());
        }

        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let account = Account {
            id: fresh_id(&accounts),
            username: candidate.username.clone(),
            email: candidate.email.clone(),
            display_name: candidate.username.clone(),
            password: Some(candidate.password.clone()),
            avatar: default_avatar(),
            provider: AuthProvider::Local,
            external_id: None,
            created_at: Utc::now(),
        };
        let profile = account.profile();

        accounts.push(account);
        self.persist(&accounts)?;

        Ok(profile)
    }

    /// Authenticate by username or email plus password
    pub fn authenticate(&self, identifier: &str, password: &str) -> Result<UserProfile, AuthError> {
        self.accounts()
            .iter()
            .find(|a| {
                (a.username == identifier || a.email == identifier)
                    && a.password.as_deref() == Some(password)
            })
            .map(Account::profile)
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Create or update an account for an external-provider identity
    ///
    /// Idempotent per provider subject: repeated callbacks for the same
    /// subject update the existing account in place.
    pub fn upsert_external(&self, identity: &ExternalIdentity) -> Result<UserProfile, AuthError> {
        let mut accounts = self.accounts();

        if let Some(account) = accounts
            .iter_mut()
            .find(|a| a.external_id.as_deref() == Some(identity.provider_id.as_str()))
        {
            account.display_name = identity.display_name.clone();
            account.email = identity.email.clone();
            if let Some(ref avatar) = identity.avatar {
                account.avatar = avatar.clone();
            }
            let profile = account.profile();
            self.persist(&accounts)?;
            return Ok(profile);
        }

        let account = Account {
            id: fresh_id(&accounts),
            username: external_username(&accounts, identity),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            password: None,
            avatar: identity.avatar.clone().unwrap_or_else(default_avatar),
            provider: AuthProvider::External,
            external_id: Some(identity.provider_id.clone()),
            created_at: Utc::now(),
        };
        let profile = account.profile();

        accounts.push(account);
        self.persist(&accounts)?;

        Ok(profile)
    }

    /// Change an account's password
    ///
    /// Returns `false` without writing when the current password does not
    /// match the stored credential (or the account is unknown).
    pub fn change_password(
        &self,
        account_id: i64,
        current: &str,
        new: &str,
    ) -> Result<bool, AuthError> {
        let mut accounts = self.accounts();

        let Some(account) = accounts.iter_mut().find(|a| a.id == account_id) else {
            return Ok(false);
        };
        if account.password.as_deref() != Some(current) {
            return Ok(false);
        }

        account.password = Some(new.to_string());
        self.persist(&accounts)?;
        Ok(true)
    }

    /// Merge profile fields into the directory entry matching by id
    ///
    /// Returns `false` when no such account exists.
    pub fn update_account(&self, account_id: i64, patch: &ProfilePatch) -> Result<bool, AuthError> {
        let mut accounts = self.accounts();

        let Some(account) = accounts.iter_mut().find(|a| a.id == account_id) else {
            return Ok(false);
        };
        patch.apply_to_account(account);

        self.persist(&accounts)?;
        Ok(true)
    }

    fn persist(&self, accounts: &[Account]) -> Result<(), StorageError> {
        self.store.set_json(keys::DIRECTORY, &accounts)
    }

    /// Write and return the fixed demo accounts
    fn seed(&self) -> Vec<Account> {
        let accounts = demo_accounts();
        if let Err(err) = self.persist(&accounts) {
            warn!(%err, "failed to persist seeded account directory");
        }
        accounts
    }
}

/// Partial profile update applied to both the session user and the
/// directory entry
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.avatar.is_none()
    }

    pub(crate) fn apply_to_account(&self, account: &mut Account) {
        if let Some(ref display_name) = self.display_name {
            account.display_name = display_name.clone();
        }
        if let Some(ref avatar) = self.avatar {
            account.avatar = avatar.clone();
        }
    }

    pub(crate) fn apply_to_profile(&self, profile: &mut UserProfile) {
        if let Some(ref display_name) = self.display_name {
            profile.display_name = display_name.clone();
        }
        if let Some(ref avatar) = self.avatar {
            profile.avatar = avatar.clone();
        }
    }
}

/// Fresh account id: current time in milliseconds, bumped to stay strictly
/// above every existing id so ids remain unique and monotonic even when
/// two accounts are created within the same millisecond
fn fresh_id(existing: &[Account]) -> i64 {
    let now = Utc::now().timestamp_millis();
    let max = existing.iter().map(|a| a.id).max().unwrap_or(0);
    now.max(max + 1)
}

/// Basic `local@domain.tld` shape check
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Pick a username for an external identity, preferring the display name,
/// then the email local part, de-duplicated against existing accounts
fn external_username(existing: &[Account], identity: &ExternalIdentity) -> String {
    let base = if !identity.display_name.trim().is_empty() {
        identity.display_name.trim().to_string()
    } else {
        identity
            .email
            .split('@')
            .next()
            .unwrap_or("user")
            .to_string()
    };

    if !existing.iter().any(|a| a.username == base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !existing.iter().any(|a| a.username == candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// The two fixed demo accounts: one regular, one privileged
fn demo_accounts() -> Vec<Account> {
    let created_at = Utc::now();
    vec![
        Account {
            id: 1,
            username: "demo_user".to_string(),
            email: "demo@cinetrack.dev".to_string(),
            display_name: "Demo User".to_string(),
            password: Some("demo123".to_string()),
            avatar: default_avatar(),
            provider: AuthProvider::Local,
            external_id: None,
            created_at,
        },
        Account {
            id: 2,
            username: "admin".to_string(),
            email: "admin@cinetrack.dev".to_string(),
            display_name: "Administrator".to_string(),
            password: Some("admin123".to_string()),
            avatar: default_avatar(),
            provider: AuthProvider::Local,
            external_id: None,
            created_at,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_directory(temp_dir: &TempDir) -> UserDirectory {
        UserDirectory::new(KvStore::new(temp_dir.path().join("store.json")))
    }

    fn signup(username: &str, email: &str, password: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
        }
    }

    #[test]
    fn test_fresh_directory_seeds_demo_accounts() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let accounts = directory.accounts();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].username, "demo_user");
        assert_eq!(accounts[1].username, "admin");

        // Demo login works out of the box
        assert!(directory.authenticate("demo_user", "demo123").is_ok());
        assert!(directory.authenticate("admin@cinetrack.dev", "admin123").is_ok());
    }

    #[test]
    fn test_corrupt_directory_reseeds() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::new(temp_dir.path().join("store.json"));
        store.set(keys::DIRECTORY, "{broken json").unwrap();

        let directory = UserDirectory::new(store);
        let accounts = directory.accounts();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].username, "demo_user");
    }

    #[test]
    fn test_register_success() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let profile = directory
            .register(&signup("ana", "a@b.com", "abcdef"))
            .unwrap();

        assert!(profile.id > 2);
        assert_eq!(profile.username, "ana");
        assert_eq!(profile.display_name, "ana");

        // No password field in the returned profile
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());

        // The stored account does carry the credential
        let stored = directory.find(profile.id).unwrap();
        assert_eq!(stored.password.as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        directory
            .register(&signup("ana", "a@b.com", "abcdef"))
            .unwrap();

        let err = directory
            .register(&signup("other", "a@b.com", "abcdef"))
            .unwrap_err();
        match err {
            AuthError::Validation(messages) => {
                assert!(messages.iter().any(|m| m.contains("already in use")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_register_rejects_duplicate_username() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        directory
            .register(&signup("ana", "a@b.com", "abcdef"))
            .unwrap();

        let result = directory.register(&signup("ana", "other@b.com", "abcdef"));
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_register_collects_all_field_errors() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let candidate = NewAccount {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
            confirm_password: "54321".to_string(),
        };

        let err = directory.register(&candidate).unwrap_err();
        match err {
            AuthError::Validation(messages) => assert_eq!(messages.len(), 4),
            other => panic!("expected validation error, got {:?}", other),
        }

        // Nothing was written
        assert_eq!(directory.accounts().len(), 2);
    }

    #[test]
    fn test_authenticate_by_username_or_email() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let registered = directory
            .register(&signup("ana", "a@b.com", "abcdef"))
            .unwrap();

        let by_name = directory.authenticate("ana", "abcdef").unwrap();
        let by_email = directory.authenticate("a@b.com", "abcdef").unwrap();
        assert_eq!(by_name, registered);
        assert_eq!(by_email, registered);
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        directory
            .register(&signup("ana", "a@b.com", "abcdef"))
            .unwrap();

        let result = directory.authenticate("ana", "wrongpass");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_change_password() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let profile = directory
            .register(&signup("ana", "a@b.com", "abcdef"))
            .unwrap();

        // Wrong current password: no write
        assert!(!directory
            .change_password(profile.id, "wrong", "newpass1")
            .unwrap());
        assert!(directory.authenticate("ana", "abcdef").is_ok());

        // Correct current password: credential replaced
        assert!(directory
            .change_password(profile.id, "abcdef", "newpass1")
            .unwrap());
        assert!(directory.authenticate("ana", "newpass1").is_ok());
        assert!(matches!(
            directory.authenticate("ana", "abcdef"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_upsert_external_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let identity = ExternalIdentity {
            provider_id: "sub-123".to_string(),
            display_name: "Ana Lema".to_string(),
            email: "ana@gmail.com".to_string(),
            avatar: Some("https://example.com/a.png".to_string()),
            email_verified: true,
        };

        let first = directory.upsert_external(&identity).unwrap();
        let count_after_first = directory.accounts().len();

        let second = directory.upsert_external(&identity).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(directory.accounts().len(), count_after_first);

        let stored = directory.find(first.id).unwrap();
        assert_eq!(stored.provider, AuthProvider::External);
        assert!(stored.password.is_none());
    }

    #[test]
    fn test_upsert_external_updates_fields() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let mut identity = ExternalIdentity {
            provider_id: "sub-123".to_string(),
            display_name: "Ana".to_string(),
            email: "ana@gmail.com".to_string(),
            avatar: None,
            email_verified: true,
        };
        let first = directory.upsert_external(&identity).unwrap();

        identity.display_name = "Ana Lema".to_string();
        let updated = directory.upsert_external(&identity).unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.display_name, "Ana Lema");
    }

    #[test]
    fn test_update_account_merges_fields() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let profile = directory
            .register(&signup("ana", "a@b.com", "abcdef"))
            .unwrap();

        let patch = ProfilePatch {
            display_name: Some("Ana L.".to_string()),
            avatar: None,
        };
        assert!(directory.update_account(profile.id, &patch).unwrap());

        let stored = directory.find(profile.id).unwrap();
        assert_eq!(stored.display_name, "Ana L.");
        // Untouched fields survive
        assert_eq!(stored.email, "a@b.com");
        assert_eq!(stored.password.as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_update_account_unknown_id() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let patch = ProfilePatch::default();
        assert!(!directory.update_account(999, &patch).unwrap());
    }

    #[test]
    fn test_fresh_ids_are_unique_and_increasing() {
        let temp_dir = TempDir::new().unwrap();
        let directory = test_directory(&temp_dir);

        let a = directory
            .register(&signup("user_a", "a@x.com", "abcdef"))
            .unwrap();
        let b = directory
            .register(&signup("user_b", "b@x.com", "abcdef"))
            .unwrap();

        assert!(b.id > a.id);
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
    }
}
