// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a server timestamp.
///
/// Accepts RFC3339 as well as the naive `YYYY-MM-DDTHH:MM:SS[.f]` form some
/// backends emit, which is taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a timestamp relative to `now` ("Just now", "5m ago", "3h ago", "2d ago").
///
/// Anything a week or older is shown as its calendar date. Timestamps that do
/// not parse are returned unchanged.
pub fn format_relative(raw: &str, now: DateTime<Utc>) -> String {
    let Some(date) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    let elapsed = now.signed_duration_since(date);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}
