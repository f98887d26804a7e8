// SPDX-License-Identifier: MPL-2.0
//! In-process backend: document store and identity provider.
//!
//! Both adapters keep their state in memory and can mirror it to a CBOR
//! snapshot in the data directory. They stand in for a hosted document
//! database and identity service behind the same ports.

mod auth;
mod documents;

pub use auth::{MemoryAuthProvider, ACCOUNTS_SNAPSHOT};
pub use documents::{MemoryDocumentStore, CATALOG_SNAPSHOT};

use chrono::{DateTime, Duration, Utc};

/// Returns `now`, or one microsecond past `last` when the clock has not
/// moved beyond it.
fn resolve_timestamp(now: DateTime<Utc>, last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    match last {
        Some(last) if last >= now => last + Duration::microseconds(1),
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn resolve_timestamp_never_goes_backwards() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(resolve_timestamp(t, None), t);
        assert_eq!(
            resolve_timestamp(t, Some(t)),
            t + Duration::microseconds(1)
        );
        let later = t + Duration::seconds(1);
        assert_eq!(resolve_timestamp(later, Some(t)), later);
    }
}
