//! Common types for version statistics

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One published version of a package together with its weekly downloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub version: String,
    /// Weekly download count attributed to this version
    pub downloads: u64,
    /// Publication timestamp
    pub time: DateTime<Utc>,
    /// Dist-tags pointing at this version, in discovery order
    pub tags: Vec<String>,
    /// Only known from the embedded payload; the HTML listing never sets it
    pub is_deprecated: bool,
}

impl VersionRecord {
    pub fn new(version: impl Into<String>, downloads: u64, time: DateTime<Utc>) -> Self {
        Self {
            version: version.into(),
            downloads,
            time,
            tags: Vec::new(),
            is_deprecated: false,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn deprecated(mut self, is_deprecated: bool) -> Self {
        self.is_deprecated = is_deprecated;
        self
    }
}

/// Sum of downloads over all records
pub fn sum_downloads(records: &[VersionRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.downloads))
}
