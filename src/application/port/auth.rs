// SPDX-License-Identifier: MPL-2.0
//! Authentication port definition.
//!
//! The console only needs a handful of verbs from its identity provider:
//! sign in with email and password, sign out, create an account, and observe
//! who is currently signed in.

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

// =============================================================================
// AuthError
// =============================================================================

/// Errors reported by an [`AuthProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email address is not well formed.
    #[error("invalid email address")]
    InvalidEmail,

    /// The password does not meet the provider's minimum requirements.
    #[error("password is too weak")]
    WeakPassword,

    /// An account with this email already exists.
    #[error("email is already registered")]
    EmailInUse,

    /// The provider could not be reached or failed internally.
    #[error("authentication service unavailable: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// Returns the i18n key shown to the user for this error.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "error-auth-invalid-credentials",
            AuthError::InvalidEmail => "error-auth-invalid-email",
            AuthError::WeakPassword => "error-auth-weak-password",
            AuthError::EmailInUse => "error-auth-email-in-use",
            AuthError::Unavailable(_) => "error-auth-unavailable",
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable account identifier.
    pub uid: String,
    /// Login email.
    pub email: String,
}

// =============================================================================
// AuthProvider Trait
// =============================================================================

/// Port for the identity provider.
///
/// `current_user` is the source of truth for the session: `sign_in` and
/// `sign_out` resolve once the provider accepted the request, and the new
/// state is published through the receiver.
pub trait AuthProvider: Send + Sync {
    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown account or a
    /// wrong password.
    fn sign_in(&self, email: &str, password: &str) -> BoxFuture<'static, Result<User, AuthError>>;

    /// Signs the current user out. Signing out while signed out is a no-op.
    fn sign_out(&self) -> BoxFuture<'static, Result<(), AuthError>>;

    /// Creates a new account. Does not change the current session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEmail`], [`AuthError::WeakPassword`] or
    /// [`AuthError::EmailInUse`] when the request is rejected.
    fn register(&self, email: &str, password: &str)
        -> BoxFuture<'static, Result<User, AuthError>>;

    /// Observes the signed-in user. `None` means signed out.
    fn current_user(&self) -> watch::Receiver<Option<User>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_distinct_keys() {
        let keys = [
            AuthError::InvalidCredentials.i18n_key(),
            AuthError::InvalidEmail.i18n_key(),
            AuthError::WeakPassword.i18n_key(),
            AuthError::EmailInUse.i18n_key(),
            AuthError::Unavailable(String::new()).i18n_key(),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unavailable_display_includes_cause() {
        let err = AuthError::Unavailable("timeout".into());
        assert!(err.to_string().contains("timeout"));
    }
}
