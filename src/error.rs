// SPDX-License-Identifier: MPL-2.0
//! Crate-level error type.
//!
//! Port-specific failures ([`AuthError`], [`StoreError`], [`BlobError`]) keep
//! their own enums so adapters can report precise causes; they fold into
//! [`Error`] when they cross into application code.

use crate::application::card_form::FormError;
use crate::application::port::{AuthError, BlobError, StoreError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Snapshot Error: {0}")]
    Snapshot(String),

    #[error("Auth Error: {0}")]
    Auth(#[from] AuthError),

    #[error("Store Error: {0}")]
    Store(#[from] StoreError),

    #[error("Blob Error: {0}")]
    Blob(#[from] BlobError),

    #[error("Form Error: {0}")]
    Form(#[from] FormError),
}

impl Error {
    /// Returns the i18n key used when this error is surfaced as a toast.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "error-io",
            Error::Config(_) => "notification-config-load-error",
            Error::Snapshot(_) => "error-snapshot",
            Error::Auth(err) => err.i18n_key(),
            Error::Store(err) => err.i18n_key(),
            Error::Blob(_) => "error-upload",
            Error::Form(err) => err.i18n_key(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl<T: std::fmt::Debug> From<ciborium::de::Error<T>> for Error {
    fn from(err: ciborium::de::Error<T>) -> Self {
        Error::Snapshot(err.to_string())
    }
}

impl<T: std::fmt::Debug> From<ciborium::ser::Error<T>> for Error {
    fn from(err: ciborium::ser::Error<T>) -> Self {
        Error::Snapshot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn port_errors_keep_their_i18n_keys() {
        let err: Error = AuthError::InvalidCredentials.into();
        assert_eq!(err.i18n_key(), "error-auth-invalid-credentials");

        let err: Error = StoreError::NotFound("CardInfo_Table/x".into()).into();
        assert_eq!(err.i18n_key(), "error-store-not-found");
    }
}
