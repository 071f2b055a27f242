//! `Retry-After` resolution.

use std::time::Duration;

use chrono::{DateTime, Utc};
use http::header::RETRY_AFTER;
use http::HeaderMap;

use crate::message::parse_http_date;

/// Delay before the next attempt, honouring a `Retry-After` hint in
/// `headers` (delta-seconds or HTTP-date relative to `now`). A missing or
/// malformed hint yields `fallback`; a date in the past yields zero.
pub fn resolve_delay(headers: &HeaderMap, now: DateTime<Utc>, fallback: Duration) -> Duration {
    let Some(value) = headers.get(RETRY_AFTER) else {
        return fallback;
    };
    let Ok(raw) = value.to_str() else {
        tracing::warn!("ignoring non-text Retry-After header");
        return fallback;
    };
    let raw = raw.trim();

    // delta-seconds is 1*DIGIT; no sign, no fraction.
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(secs) = raw.parse::<u64>() {
            return Duration::from_secs(secs);
        }
    }
    if let Some(date) = parse_http_date(raw) {
        return (date - now).to_std().unwrap_or(Duration::ZERO);
    }

    tracing::warn!("ignoring malformed Retry-After header: \"{}\"", raw);
    fallback
}
