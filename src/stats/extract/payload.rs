//! Extractor for the JSON payload embedded in the package page
//!
//! The page ships its state as `window.__context__ = {...}` inside a script
//! element carrying an `integrity` attribute. The object literal is plain
//! JSON, so it is deserialized directly instead of running the script.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::DateTime;
use indexmap::IndexMap;
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::stats::error::ExtractError;
use crate::stats::extract::{Extractor, Source, selector};
use crate::stats::tags::reverse_tags;
use crate::stats::types::VersionRecord;

const PAYLOAD_SCRIPT: &str = "script[integrity]";

static CONTEXT_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\.__context__\s*=\s*").expect("valid regex"));

#[derive(Debug, Deserialize)]
struct ContextEnvelope {
    context: Option<PageContext>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageContext {
    #[serde(default)]
    versions_downloads: HashMap<String, u64>,
    packument: Option<Packument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Packument {
    #[serde(default)]
    versions: Vec<PackumentVersion>,
    #[serde(default)]
    dist_tags: IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct PackumentVersion {
    version: String,
    date: PublishDate,
    #[serde(default)]
    deprecated: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PublishDate {
    /// Milliseconds since UNIX epoch
    ts: i64,
}

/// Reads versions, downloads, dist-tags and deprecations from the embedded payload
#[derive(Debug, Default)]
pub struct StructuredPayloadExtractor;

impl StructuredPayloadExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Locate the payload object inside the script text and deserialize it
    fn parse_context(script: &str) -> Option<PageContext> {
        let start = CONTEXT_ASSIGNMENT.find(script)?.end();
        let mut stream =
            serde_json::Deserializer::from_str(&script[start..]).into_iter::<ContextEnvelope>();

        match stream.next()? {
            Ok(envelope) => envelope.context,
            Err(e) => {
                warn!("Failed to parse embedded page context: {}", e);
                None
            }
        }
    }

    fn into_records(context: PageContext) -> Vec<VersionRecord> {
        let Some(packument) = context.packument else {
            return Vec::new();
        };
        let tags = reverse_tags(&packument.dist_tags);
        let downloads = context.versions_downloads;

        packument
            .versions
            .into_iter()
            .filter_map(|entry| {
                let Some(time) = DateTime::from_timestamp_millis(entry.date.ts) else {
                    warn!(
                        "Skipping version {} with out-of-range timestamp {}",
                        entry.version, entry.date.ts
                    );
                    return None;
                };
                let record = VersionRecord::new(
                    entry.version.clone(),
                    downloads.get(&entry.version).copied().unwrap_or(0),
                    time,
                )
                .with_tags(tags.get(&entry.version).cloned().unwrap_or_default())
                .deprecated(is_truthy(entry.deprecated.as_ref()));
                Some(record)
            })
            .collect()
    }
}

/// A deprecation marker is usually the message string; empty or false means none
fn is_truthy(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}

impl Extractor for StructuredPayloadExtractor {
    fn source(&self) -> Source {
        Source::StructuredPayload
    }

    fn extract(&self, document: &Html) -> Result<Vec<VersionRecord>, ExtractError> {
        let script_selector = selector(PAYLOAD_SCRIPT)?;

        let Some(script) = document.select(&script_selector).next() else {
            debug!("No payload script found");
            return Ok(Vec::new());
        };
        let text: String = script.text().collect();

        let Some(context) = Self::parse_context(&text) else {
            debug!("Payload script does not carry a page context");
            return Ok(Vec::new());
        };

        Ok(Self::into_records(context))
    }
}
