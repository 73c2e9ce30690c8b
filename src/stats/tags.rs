//! Dist-tag reconciliation
//!
//! The HTML version listing renders dist-tags as separate list items that
//! point at a version listed further down. [`resolve_tags`] moves those tags
//! onto the version entry they refer to.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::stats::error::ExtractError;
use crate::stats::types::VersionRecord;

/// One classified item of the version listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    /// Names a tag and the version it points at, carries no statistics
    Tag { version: String, tag: String },
    /// A published version; `time` is `None` when the timestamp was unparsable
    Version {
        version: String,
        downloads: u64,
        time: Option<DateTime<Utc>>,
    },
}

/// Attach buffered tag entries to their version entries, preserving listing order.
///
/// Version entries without a timestamp are headers or other noise and are
/// dropped. Fails with [`ExtractError::Integrity`] if a tag entry never finds
/// its version.
pub fn resolve_tags(
    entries: impl IntoIterator<Item = RawEntry>,
) -> Result<Vec<VersionRecord>, ExtractError> {
    let mut pending: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut records = Vec::new();

    for entry in entries {
        match entry {
            RawEntry::Tag { version, tag } => {
                pending.entry(version).or_default().push(tag);
            }
            RawEntry::Version {
                version,
                downloads,
                time: Some(time),
            } => {
                let tags = pending.shift_remove(&version).unwrap_or_default();
                records.push(VersionRecord::new(version, downloads, time).with_tags(tags));
            }
            RawEntry::Version { version, .. } => {
                debug!("Skipping listing entry without timestamp: {}", version);
            }
        }
    }

    if !pending.is_empty() {
        let orphaned = pending
            .into_iter()
            .flat_map(|(version, tags)| tags.into_iter().map(move |tag| format!("{tag}@{version}")))
            .collect();
        return Err(ExtractError::Integrity { orphaned });
    }

    Ok(records)
}

/// Invert a tag -> version mapping into version -> tags, keeping tag order
pub fn reverse_tags(dist_tags: &IndexMap<String, String>) -> HashMap<String, Vec<String>> {
    let mut by_version: HashMap<String, Vec<String>> = HashMap::new();
    for (tag, version) in dist_tags {
        by_version
            .entry(version.clone())
            .or_default()
            .push(tag.clone());
    }
    by_version
}
