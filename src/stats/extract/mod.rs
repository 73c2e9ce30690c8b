//! Extractors turning a parsed registry page into version records
//!
//! The npm package page exposes the version history twice: as a JSON payload
//! embedded in a script element and as a rendered HTML list. Each encoding
//! has its own [`Extractor`]; both produce the same [`VersionRecord`] model.

use scraper::{Html, Selector};

use crate::stats::error::ExtractError;
use crate::stats::types::VersionRecord;

pub mod html;
pub mod payload;

pub use html::HtmlListingExtractor;
pub use payload::StructuredPayloadExtractor;

/// Encoding a record list was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// JSON payload embedded in the page (`window.__context__`)
    StructuredPayload,
    /// Rendered version list, used when the payload is unavailable
    HtmlListing,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::StructuredPayload => "structured_payload",
            Source::HtmlListing => "html_listing",
        }
    }
}

/// Trait for extracting version records from a parsed page
pub trait Extractor: Send + Sync {
    /// Returns the encoding this extractor reads
    fn source(&self) -> Source;

    /// Extracts version records in page order
    ///
    /// # Returns
    /// * `Ok(Vec<VersionRecord>)` - Records found, empty if this encoding is unavailable
    /// * `Err(ExtractError)` - If the encoding is present but inconsistent
    fn extract(&self, document: &Html) -> Result<Vec<VersionRecord>, ExtractError>;
}

pub(crate) fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}
