// SPDX-License-Identifier: MPL-2.0
//! In-memory [`AuthProvider`] with salted `blake3` password hashes.
//!
//! Accounts and the signed-in uid are mirrored to `accounts.cbor`, so a
//! session survives a restart the way a hosted identity provider keeps it.

use crate::app::config::{SeedAccount, MIN_PASSWORD_LEN};
use crate::application::port::{AuthError, AuthProvider, User};
use crate::infrastructure::snapshot;
use futures_util::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Snapshot file name inside the data directory.
pub const ACCOUNTS_SNAPSHOT: &str = "accounts.cbor";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    uid: String,
    email: String,
    salt: String,
    password_hash: String,
}

impl Account {
    fn new(email: &str, password: &str) -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        let password_hash = hash_password(&salt, password).to_hex().to_string();
        Self {
            uid: uuid::Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            salt,
            password_hash,
        }
    }

    fn verify(&self, password: &str) -> bool {
        // `blake3::Hash` equality is constant-time.
        blake3::Hash::from_hex(&self.password_hash)
            .is_ok_and(|stored| stored == hash_password(&self.salt, password))
    }

    fn user(&self) -> User {
        User {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}

fn hash_password(salt: &str, password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize()
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    /// Keyed by normalized email.
    accounts: BTreeMap<String, Account>,
    #[serde(default)]
    session_uid: Option<String>,
}

#[derive(Debug)]
struct Inner {
    state: Mutex<Snapshot>,
    current: watch::Sender<Option<User>>,
    snapshot_path: Option<PathBuf>,
}

/// Email and password accounts kept in process memory.
#[derive(Debug, Clone)]
pub struct MemoryAuthProvider {
    inner: Arc<Inner>,
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuthProvider {
    /// Creates a provider with no accounts and no persistence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(Snapshot::default(), None)
    }

    /// Opens a provider persisted at `path`, restoring the last session.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let state = match snapshot::load::<Snapshot>(&path) {
            Ok(state) => state.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "account snapshot unreadable, starting empty");
                Snapshot::default()
            }
        };
        tracing::info!(path = %path.display(), accounts = state.accounts.len(), "accounts opened");
        Self::with_state(state, Some(path))
    }

    fn with_state(state: Snapshot, snapshot_path: Option<PathBuf>) -> Self {
        let signed_in = state.session_uid.as_ref().and_then(|uid| {
            state
                .accounts
                .values()
                .find(|account| &account.uid == uid)
                .map(Account::user)
        });
        let (current, _) = watch::channel(signed_in);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                current,
                snapshot_path,
            }),
        }
    }

    /// Creates `seed` when the store has no account yet.
    ///
    /// Returns whether the account was created.
    pub fn seed(&self, seed: &SeedAccount) -> bool {
        if !self.inner.lock().accounts.is_empty() {
            return false;
        }
        match self.inner.create_account(&seed.email, &seed.password) {
            Ok(user) => {
                tracing::info!(email = %user.email, "seed account created");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "seed account rejected");
                false
            }
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &Snapshot) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        if let Err(err) = snapshot::save(path, state) {
            tracing::error!(path = %path.display(), %err, "failed to persist accounts");
        }
    }

    fn create_account(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let key = normalize_email(email);
        if !is_valid_email(&key) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let mut state = self.lock();
        if state.accounts.contains_key(&key) {
            return Err(AuthError::EmailInUse);
        }
        let account = Account::new(&key, password);
        let user = account.user();
        state.accounts.insert(key, account);
        self.persist(&state);
        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let mut state = self.lock();
        let user = state
            .accounts
            .get(&normalize_email(email))
            .filter(|account| account.verify(password))
            .map(Account::user)
            .ok_or(AuthError::InvalidCredentials)?;
        state.session_uid = Some(user.uid.clone());
        self.persist(&state);
        drop(state);

        self.current.send_replace(Some(user.clone()));
        Ok(user)
    }

    fn sign_out(&self) {
        let mut state = self.lock();
        if state.session_uid.take().is_some() {
            self.persist(&state);
        }
        drop(state);
        self.current.send_replace(None);
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

impl AuthProvider for MemoryAuthProvider {
    fn sign_in(&self, email: &str, password: &str) -> BoxFuture<'static, Result<User, AuthError>> {
        let result = self.inner.sign_in(email, password);
        match &result {
            Ok(user) => tracing::info!(uid = %user.uid, "signed in"),
            Err(err) => tracing::info!(%err, "sign-in rejected"),
        }
        future::ready(result).boxed()
    }

    fn sign_out(&self) -> BoxFuture<'static, Result<(), AuthError>> {
        self.inner.sign_out();
        tracing::info!("signed out");
        future::ready(Ok(())).boxed()
    }

    fn register(&self, email: &str, password: &str) -> BoxFuture<'static, Result<User, AuthError>> {
        future::ready(self.inner.create_account(email, password)).boxed()
    }

    fn current_user(&self) -> watch::Receiver<Option<User>> {
        self.inner.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const EMAIL: &str = "admin@example.com";

    #[tokio::test]
    async fn register_then_sign_in() {
        let auth = MemoryAuthProvider::new();
        let created = auth.register(EMAIL, "secret1").await.unwrap();
        assert!(auth.current_user().borrow().is_none());

        let user = auth.sign_in(EMAIL, "secret1").await.unwrap();
        assert_eq!(user, created);
        assert_eq!(auth.current_user().borrow().as_ref(), Some(&user));
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let auth = MemoryAuthProvider::new();
        auth.register(" Admin@Example.com ", "secret1").await.unwrap();
        assert!(auth.sign_in(EMAIL, "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = MemoryAuthProvider::new();
        auth.register(EMAIL, "secret1").await.unwrap();
        assert_eq!(
            auth.sign_in(EMAIL, "secret2").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.sign_in("nobody@example.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn registration_rules() {
        let auth = MemoryAuthProvider::new();
        assert_eq!(
            auth.register("not-an-email", "secret1").await,
            Err(AuthError::InvalidEmail)
        );
        assert_eq!(auth.register(EMAIL, "12345").await, Err(AuthError::WeakPassword));
        auth.register(EMAIL, "123456").await.unwrap();
        assert_eq!(
            auth.register(EMAIL, "another1").await,
            Err(AuthError::EmailInUse)
        );
    }

    #[tokio::test]
    async fn sign_out_publishes_none() {
        let auth = MemoryAuthProvider::new();
        auth.register(EMAIL, "secret1").await.unwrap();
        auth.sign_in(EMAIL, "secret1").await.unwrap();

        let mut receiver = auth.current_user();
        auth.sign_out().await.unwrap();
        receiver.changed().await.unwrap();
        assert!(receiver.borrow().is_none());
    }

    #[test]
    fn seed_only_fills_an_empty_store() {
        let auth = MemoryAuthProvider::new();
        let seed = SeedAccount {
            email: EMAIL.into(),
            password: "secret1".into(),
        };
        assert!(auth.seed(&seed));
        assert!(!auth.seed(&SeedAccount {
            email: "second@example.com".into(),
            password: "secret1".into(),
        }));
    }

    #[tokio::test]
    async fn session_and_accounts_survive_reopen() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(ACCOUNTS_SNAPSHOT);

        let auth = MemoryAuthProvider::open(path.clone());
        auth.register(EMAIL, "secret1").await.unwrap();
        auth.sign_in(EMAIL, "secret1").await.unwrap();
        drop(auth);

        let reopened = MemoryAuthProvider::open(path);
        assert_eq!(
            reopened.current_user().borrow().as_ref().map(|u| u.email.clone()),
            Some(EMAIL.to_string())
        );
        reopened.sign_out().await.unwrap();
        assert!(reopened.sign_in(EMAIL, "secret1").await.is_ok());
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b@c.co"));
        assert!(!is_valid_email("a@.co"));
    }

    #[test]
    fn password_hash_is_salted() {
        let a = Account::new(EMAIL, "secret1");
        let b = Account::new(EMAIL, "secret1");
        assert_ne!(a.password_hash, b.password_hash);
        assert!(a.verify("secret1"));
        assert!(!a.verify("secret2"));
    }
}
