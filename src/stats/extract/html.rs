//! Extractor for the rendered version list
//!
//! Each `<li>` of the versions tab is either a version row (it has a `<time>`
//! element), a dist-tag row (it has a nested `<code>` label naming the tag),
//! or noise such as a section header.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::stats::error::ExtractError;
use crate::stats::extract::{Extractor, Source, selector};
use crate::stats::tags::{RawEntry, resolve_tags};
use crate::stats::types::VersionRecord;

const LIST_ITEMS: &str = "#tabpanel-versions > div > ul > li";
const TIME: &str = "time";
const TAG_LABEL: &str = "ul li code";
const VERSION_LABEL: &str = "a";
const DOWNLOADS: &str = ".downloads";

struct ItemSelectors {
    time: Selector,
    tag: Selector,
    version: Selector,
    downloads: Selector,
}

impl ItemSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            time: selector(TIME)?,
            tag: selector(TAG_LABEL)?,
            version: selector(VERSION_LABEL)?,
            downloads: selector(DOWNLOADS)?,
        })
    }
}

/// Reads version rows from the HTML listing and reconciles dist-tag rows onto them
///
/// The listing carries no deprecation marker, so every record it produces has
/// `is_deprecated == false`.
#[derive(Debug, Default)]
pub struct HtmlListingExtractor;

impl HtmlListingExtractor {
    pub fn new() -> Self {
        Self
    }

    fn classify(
        index: usize,
        item: ElementRef<'_>,
        selectors: &ItemSelectors,
    ) -> Result<Option<RawEntry>, ExtractError> {
        let version = first_text(item, &selectors.version);

        if let Some(time) = item.select(&selectors.time).next() {
            let Some(time) = time.value().attr("datetime").and_then(parse_time) else {
                return Ok(version.map(|version| RawEntry::Version {
                    version,
                    downloads: 0,
                    time: None,
                }));
            };
            let version = version.ok_or(ExtractError::MissingVersion { index })?;
            let downloads = parse_downloads(&version, first_text(item, &selectors.downloads))?;
            return Ok(Some(RawEntry::Version {
                version,
                downloads,
                time: Some(time),
            }));
        }

        if let Some(tag) = first_text(item, &selectors.tag) {
            let version = version.ok_or(ExtractError::MissingVersion { index })?;
            return Ok(Some(RawEntry::Tag { version, tag }));
        }

        debug!("Skipping version list item #{} without time or tag", index);
        Ok(None)
    }
}

fn first_text(item: ElementRef<'_>, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Parse a comma-grouped integer such as `1,234,567`
fn parse_downloads(version: &str, raw: Option<String>) -> Result<u64, ExtractError> {
    let raw = raw.unwrap_or_default();
    raw.replace(',', "")
        .parse::<u64>()
        .map_err(|_| ExtractError::InvalidDownloads {
            version: version.to_string(),
            raw,
        })
}

impl Extractor for HtmlListingExtractor {
    fn source(&self) -> Source {
        Source::HtmlListing
    }

    fn extract(&self, document: &Html) -> Result<Vec<VersionRecord>, ExtractError> {
        let list_items = selector(LIST_ITEMS)?;
        let selectors = ItemSelectors::new()?;

        let entries = document
            .select(&list_items)
            .enumerate()
            .map(|(index, item)| Self::classify(index, item, &selectors))
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, _>>()?;

        resolve_tags(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn listing(items: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div id="tabpanel-versions"><div><h3>Current Tags</h3><ul>{items}</ul></div></div></body></html>"#
        ))
    }

    fn version_item(version: &str, downloads: &str, time: &str) -> String {
        format!(
            r#"<li><a href="/package/demo/v/{version}">{version}</a><span class="downloads">{downloads}</span><time dateTime="{time}">a year ago</time></li>"#
        )
    }

    fn tag_item(version: &str, tag: &str) -> String {
        format!(
            r#"<li><a href="/package/demo/v/{version}">{version}</a><ul><li><code>{tag}</code></li></ul></li>"#
        )
    }

    #[test]
    fn extract_reads_version_rows_and_attaches_tags() {
        let document = listing(&[
            tag_item("1.2.0", "latest"),
            r#"<li><h3>Version History</h3></li>"#.to_string(),
            version_item("1.2.0", "1,234,567", "2024-02-01T10:00:00.000Z"),
            version_item("1.1.0", "42", "2023-12-24T08:30:00.000Z"),
        ]
        .concat());

        let records = HtmlListingExtractor::new().extract(&document).unwrap();

        assert_eq!(
            records,
            vec![
                VersionRecord::new(
                    "1.2.0",
                    1_234_567,
                    Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()
                )
                .with_tags(vec!["latest".to_string()]),
                VersionRecord::new(
                    "1.1.0",
                    42,
                    Utc.with_ymd_and_hms(2023, 12, 24, 8, 30, 0).unwrap()
                ),
            ]
        );
    }

    #[test]
    fn extract_fails_for_tag_without_version_row() {
        let document = listing(&[
            tag_item("2.0.0", "next"),
            version_item("1.0.0", "10", "2024-02-01T10:00:00.000Z"),
        ]
        .concat());

        let result = HtmlListingExtractor::new().extract(&document);

        assert!(matches!(result, Err(ExtractError::Integrity { .. })));
    }

    #[test]
    fn extract_drops_rows_with_unparsable_time() {
        let document = listing(&[
            version_item("1.0.0", "not a number", "yesterday"),
            version_item("0.9.0", "7", "2024-02-01T10:00:00.000Z"),
        ]
        .concat());

        let records = HtmlListingExtractor::new().extract(&document).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].version, "0.9.0");
    }

    #[test]
    fn extract_skips_unlabelled_rows_with_unparsable_time() {
        let document = listing(&[
            r#"<li><h3>Version History</h3><time>updated recently</time></li>"#.to_string(),
            version_item("0.9.0", "7", "2024-02-01T10:00:00.000Z"),
        ]
        .concat());

        let records = HtmlListingExtractor::new().extract(&document).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].version, "0.9.0");
    }

    #[test]
    fn extract_requires_version_label_on_dated_rows() {
        let document = listing(
            r#"<li><span class="downloads">5</span><time dateTime="2024-02-01T10:00:00.000Z">a year ago</time></li>"#,
        );

        let result = HtmlListingExtractor::new().extract(&document);

        assert!(matches!(
            result,
            Err(ExtractError::MissingVersion { index: 0 })
        ));
    }

    #[test]
    fn extract_rejects_unparsable_download_count() {
        let document = listing(&version_item("1.0.0", "n/a", "2024-02-01T10:00:00.000Z"));

        let result = HtmlListingExtractor::new().extract(&document);

        match result {
            Err(ExtractError::InvalidDownloads { version, raw }) => {
                assert_eq!(version, "1.0.0");
                assert_eq!(raw, "n/a");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn extract_returns_empty_without_listing() {
        let document = Html::parse_document("<html><body></body></html>");

        let records = HtmlListingExtractor::new().extract(&document).unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn extract_never_marks_records_deprecated() {
        let document = listing(&version_item("1.0.0", "1", "2024-02-01T10:00:00.000Z"));

        let records = HtmlListingExtractor::new().extract(&document).unwrap();

        assert!(!records[0].is_deprecated);
    }
}
