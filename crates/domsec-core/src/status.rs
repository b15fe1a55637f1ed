// # Detection Status
//
// One DetectionRecord per registered domain holds the latest known Google and
// Spamhaus verdicts plus the time they were recorded.
//
// ## Traffic-light vocabulary
//
// | Verdict       | Color  | Written as | Also read as |
// |---------------|--------|------------|--------------|
// | Pending       | purple | "purple"   | "紫色"       |
// | Clear         | green  | "green"    | "绿色"       |
// | Flagged       | red    | "red"      | "红色"       |
// | Indeterminate | yellow | "yellow"   | "黄色"       |
//
// The detection job that fills these records runs outside this workspace and
// may write labels we do not know. Those are kept verbatim as
// `Verdict::Other` so a read-merge-write cycle never rewrites them, and
// renderers show them in a neutral style.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::Domain;

/// Mapping of every tracked domain to its latest detection record
pub type StatusMap = BTreeMap<Domain, DetectionRecord>;

/// Timestamp format written by the legacy detection job
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Verdict of one reputation service for one domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    /// Newly added, awaiting the first detection run
    Pending,
    /// No issue found
    Clear,
    /// Listed or reported by the service
    Flagged,
    /// Ambiguous result
    Indeterminate,
    /// Label this version does not recognize, kept as written
    Other(String),
}

impl Verdict {
    /// Traffic-light color of this verdict, `None` for unrecognized labels
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Verdict::Pending => Some("purple"),
            Verdict::Clear => Some("green"),
            Verdict::Flagged => Some("red"),
            Verdict::Indeterminate => Some("yellow"),
            Verdict::Other(_) => None,
        }
    }

    /// Label as persisted and returned over the API
    pub fn label(&self) -> &str {
        match self {
            Verdict::Other(raw) => raw.as_str(),
            known => known.color().unwrap_or_default(),
        }
    }

    /// Whether the detection job has not reported on this domain yet
    pub fn is_pending(&self) -> bool {
        matches!(self, Verdict::Pending)
    }
}

impl From<String> for Verdict {
    fn from(label: String) -> Self {
        match label.as_str() {
            "purple" | "紫色" => Verdict::Pending,
            "green" | "绿色" => Verdict::Clear,
            "red" | "红色" => Verdict::Flagged,
            "yellow" | "黄色" => Verdict::Indeterminate,
            _ => Verdict::Other(label),
        }
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        verdict.label().to_string()
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Latest detection result for a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Google Safe Browsing verdict
    pub google_status: Verdict,
    /// Spamhaus verdict
    pub spamhaus_status: Verdict,
    /// When the record was last written, as an ISO-8601 string
    pub timestamp: String,
}

impl DetectionRecord {
    /// Placeholder record for a freshly registered domain
    pub fn pending(at: DateTime<Utc>) -> Self {
        Self {
            google_status: Verdict::Pending,
            spamhaus_status: Verdict::Pending,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Whether neither service has reported yet
    pub fn is_pending(&self) -> bool {
        self.google_status.is_pending() && self.spamhaus_status.is_pending()
    }

    /// Parse the timestamp, accepting RFC 3339 and the legacy
    /// `YYYY-MM-DD HH:MM:SS` form (interpreted as UTC)
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.timestamp, LEGACY_TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Insert a pending record for `domain` unless one already exists
///
/// Returns `true` if the map changed. Existing records are never touched,
/// whatever their verdicts or timestamp.
pub fn merge_pending(statuses: &mut StatusMap, domain: &Domain, at: DateTime<Utc>) -> bool {
    if statuses.contains_key(domain) {
        return false;
    }
    statuses.insert(domain.clone(), DetectionRecord::pending(at));
    true
}
