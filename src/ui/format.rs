// SPDX-License-Identifier: MPL-2.0
//! Display formatting shared by the catalog screens.

use chrono::{DateTime, Local, Utc};

/// Local date and time, or an empty string for records without a timestamp.
#[must_use]
pub fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Yen amount with thousands separators, or `-` when unset.
#[must_use]
pub fn yen(value: Option<i64>) -> String {
    match value {
        Some(amount) => format!("¥{}", group_thousands(amount)),
        None => "-".to_string(),
    }
}

/// Plain quantity, or `-` when unset.
#[must_use]
pub fn quantity(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |qty| qty.to_string())
}

fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
