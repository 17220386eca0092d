//! Parsers turning raw feed payloads into disruption records.
//!
//! Every item is converted independently: a malformed item is logged and
//! recorded in the [`BatchReport`] while the rest of the batch goes through.
//! Only a payload that cannot be read at all is an error.

pub mod authority;
pub mod council;
pub mod report;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::models::Disruption;

pub use authority::parse_authority_feed;
pub use council::parse_council_feed;
pub use report::{BatchReport, SkippedItem};

/// Disruptions parsed from one payload
#[derive(Debug, Default)]
pub struct FeedBatch {
    /// Server-side timestamp of the payload, when it carries one
    pub timestamp: Option<DateTime<Utc>>,
    pub disruptions: Vec<Disruption>,
    pub report: BatchReport,
}

impl FeedBatch {
    /// Is this payload newer than `last`? Payloads without a timestamp, or
    /// with nothing to compare against, always count as newer.
    pub fn is_newer_than(&self, last: Option<DateTime<Utc>>) -> bool {
        match (self.timestamp, last) {
            (Some(current), Some(last)) => current > last,
            _ => true,
        }
    }
}

/// First of `keys` holding a non-blank string or a number, as a string.
pub(crate) fn first_string(properties: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match properties.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
