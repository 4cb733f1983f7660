//! Event timestamps and the debounce gate.

use crate::config::DebounceConfig;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

const ISO_8601_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Parses `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Anything else, including other ISO-8601 spellings, yields `None`.
pub fn parse_iso8601(timestamp: &str) -> Option<DateTime<Utc>> {
    if timestamp.len() != 24 || !timestamp.ends_with('Z') {
        return None;
    }
    NaiveDateTime::parse_from_str(timestamp, ISO_8601_MILLIS)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats a UTC time with millisecond precision and a trailing `Z`.
pub fn format_iso8601(timestamp: DateTime<Utc>) -> String {
    timestamp.format(ISO_8601_MILLIS).to_string()
}

/// Suppresses events whose declared timestamp is still inside the window.
#[derive(Debug, Clone, Copy)]
pub struct DebounceGate {
    window: Duration,
}

impl DebounceGate {
    pub fn new(window: Duration) -> Self {
        DebounceGate { window }
    }

    pub fn from_config(config: &DebounceConfig) -> Self {
        DebounceGate::new(config.window)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `false` only for a well-formed timestamp newer than
    /// `now - window`. Missing or malformed timestamps always sync.
    pub fn should_sync(&self, timestamp: Option<&str>, now: DateTime<Utc>) -> bool {
        match timestamp.and_then(parse_iso8601) {
            Some(event_time) => now - event_time >= self.window,
            None => true,
        }
    }
}
