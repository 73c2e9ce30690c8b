//! Fetch orchestrator
//!
//! Downloads the package page once and tries each extractor in order: the
//! embedded payload first, the HTML listing as fallback.

use scraper::Html;
use tracing::{info, warn};

use crate::stats::error::FetchError;
use crate::stats::extract::{
    Extractor, HtmlListingExtractor, Source, StructuredPayloadExtractor,
};
use crate::stats::registry::PageSource;
use crate::stats::types::VersionRecord;

/// Fetch the version history of `package_name`.
///
/// Returns an empty list when neither encoding yields records; every other
/// failure is propagated.
pub async fn fetch(
    source: &dyn PageSource,
    package_name: &str,
) -> Result<Vec<VersionRecord>, FetchError> {
    if package_name.trim().is_empty() {
        return Err(FetchError::InvalidArgument(
            "Package name required".to_string(),
        ));
    }

    info!("Fetching stats for {}", package_name);
    let body = source.fetch_page(package_name).await?;

    let records = extract_records(&body)?;
    if records.is_empty() {
        warn!("Failed to parse versions of {}", package_name);
    }
    Ok(records)
}

/// Run the extractors over a raw page, returning the first non-empty result
pub fn extract_records(body: &str) -> Result<Vec<VersionRecord>, FetchError> {
    let document = Html::parse_document(body);
    let extractors: [&dyn Extractor; 2] =
        [&StructuredPayloadExtractor, &HtmlListingExtractor];

    for extractor in extractors {
        let records = extractor.extract(&document)?;
        if !records.is_empty() {
            info!(
                "Extracted {} versions from {}",
                records.len(),
                extractor.source().as_str()
            );
            return Ok(records);
        }
        if extractor.source() == Source::StructuredPayload {
            info!("Embedded payload unavailable, falling back to HTML listing");
        }
    }

    Ok(Vec::new())
}
