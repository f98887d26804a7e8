// SPDX-License-Identifier: MPL-2.0
//! Session state and access control for protected screens.

use crate::application::card_form::FormError;
use crate::application::port::{AuthError, AuthProvider, User};
use std::sync::Arc;

/// What the console knows about the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// The provider has not reported the session yet.
    #[default]
    Pending,
    SignedOut,
    SignedIn(User),
}

impl AuthState {
    /// State after the provider reported `user`.
    #[must_use]
    pub fn from_user(user: Option<User>) -> Self {
        match user {
            Some(user) => AuthState::SignedIn(user),
            None => AuthState::SignedOut,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            AuthState::Pending | AuthState::SignedOut => None,
        }
    }

    /// Decides how a screen may be shown in this state.
    #[must_use]
    pub fn access(&self, protected: bool) -> Access {
        match (protected, self) {
            (false, _) | (true, AuthState::SignedIn(_)) => Access::Granted,
            (true, AuthState::Pending) => Access::Checking,
            (true, AuthState::SignedOut) => Access::RedirectToLogin,
        }
    }
}

/// Outcome of the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Show the "checking authentication" overlay.
    Checking,
    RedirectToLogin,
}

/// Checks the password confirmation of the registration form.
///
/// # Errors
///
/// Returns [`FormError::PasswordMismatch`] when the two entries differ.
pub fn check_password_confirmation(password: &str, confirmation: &str) -> Result<(), FormError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(FormError::PasswordMismatch)
    }
}

/// Creates an account, then signs in with it.
///
/// # Errors
///
/// Returns the provider's rejection of either step.
pub async fn register_and_sign_in(
    auth: Arc<dyn AuthProvider>,
    email: String,
    password: String,
) -> Result<User, AuthError> {
    let created = auth.register(&email, &password).await?;
    tracing::info!(uid = %created.uid, "account registered");
    auth.sign_in(&email, &password).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            uid: "u1".into(),
            email: "admin@example.com".into(),
        }
    }

    #[test]
    fn protected_screens_wait_while_pending() {
        assert_eq!(AuthState::Pending.access(true), Access::Checking);
        assert_eq!(AuthState::SignedOut.access(true), Access::RedirectToLogin);
        assert_eq!(AuthState::SignedIn(user()).access(true), Access::Granted);
    }

    #[test]
    fn public_screens_are_always_granted() {
        assert_eq!(AuthState::Pending.access(false), Access::Granted);
        assert_eq!(AuthState::SignedOut.access(false), Access::Granted);
    }

    #[test]
    fn from_user_maps_presence() {
        assert_eq!(AuthState::from_user(None), AuthState::SignedOut);
        assert_eq!(
            AuthState::from_user(Some(user())).user().map(|u| u.email.as_str()),
            Some("admin@example.com")
        );
    }

    #[test]
    fn password_confirmation_must_match() {
        assert!(check_password_confirmation("secret1", "secret1").is_ok());
        assert_eq!(
            check_password_confirmation("secret1", "secret2"),
            Err(FormError::PasswordMismatch)
        );
    }
}
