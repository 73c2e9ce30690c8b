//! Filter/sort/limit engine
//!
//! [`filter`] applies the options in a fixed order:
//!
//! 1. drop deprecated versions unless `show_deprecated`
//! 2. drop versions outside `semver_range`
//! 3. drop versions below `min` downloads (inclusive bound)
//! 4. sort by `sort` (downloads descending by default)
//! 5. keep the first `limit` records
//! 6. keep the prefix that stays within `limit_total` of all downloads
//!
//! Percentages are always relative to the downloads of the unfiltered input.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::stats::error::FilterError;
use crate::stats::number::{
    NumberInput, Percentage, PercentageError, Threshold, ensure_positive_number,
};
use crate::stats::semver::{VersionRange, compare_versions};
use crate::stats::types::{VersionRecord, sum_downloads};

/// Comparator applied in step 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Most downloaded first
    Downloads,
    /// Most recently published first
    Time,
    /// Highest semantic version first
    Version,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Downloads, SortKey::Time, SortKey::Version];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Downloads => "downloads",
            SortKey::Time => "time",
            SortKey::Version => "version",
        }
    }

    fn compare(&self, a: &VersionRecord, b: &VersionRecord) -> Ordering {
        match self {
            SortKey::Downloads => b.downloads.cmp(&a.downloads),
            SortKey::Time => b.time.cmp(&a.time),
            SortKey::Version => compare_versions(&b.version, &a.version),
        }
    }
}

impl FromStr for SortKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = SortKey::ALL.iter().map(SortKey::as_str).collect();
                FilterError::invalid(
                    "sort",
                    s,
                    format!("expected one of: {}, false", valid.join(", ")),
                )
            })
    }
}

/// Options for [`filter`]
///
/// Textual values are validated once by the `with_*` constructors, so
/// filtering itself cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub show_deprecated: bool,
    pub semver_range: Option<VersionRange>,
    pub min: Option<Threshold>,
    /// `None` keeps the filtered order
    pub sort: Option<SortKey>,
    pub limit: Option<usize>,
    pub limit_total: Option<Percentage>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            show_deprecated: false,
            semver_range: None,
            min: None,
            sort: Some(SortKey::Downloads),
            limit: None,
            limit_total: None,
        }
    }
}

impl FilterOptions {
    pub fn show_deprecated(mut self, show: bool) -> Self {
        self.show_deprecated = show;
        self
    }

    pub fn with_semver_range(mut self, range: &str) -> Result<Self, FilterError> {
        let parsed = range
            .parse::<VersionRange>()
            .map_err(|e| FilterError::invalid("semverRange", range, e.reason))?;
        self.semver_range = Some(parsed);
        Ok(self)
    }

    /// Accepts `"12"` (absolute) or `"10%"` (share of total downloads)
    pub fn with_min(mut self, min: &str) -> Result<Self, FilterError> {
        let threshold = min.parse::<Threshold>().map_err(|source| FilterError::Number {
            option: "min",
            value: min.to_string(),
            source,
        })?;
        self.min = Some(threshold);
        Ok(self)
    }

    /// Accepts `downloads`, `time`, `version`, or `false` to keep the filtered order
    pub fn with_sort(mut self, sort: &str) -> Result<Self, FilterError> {
        self.sort = match sort {
            "false" => None,
            key => Some(key.parse()?),
        };
        Ok(self)
    }

    pub fn with_limit(mut self, limit: &str) -> Result<Self, FilterError> {
        let value =
            ensure_positive_number(NumberInput::Text(limit)).map_err(|source| {
                FilterError::Number {
                    option: "limit",
                    value: limit.to_string(),
                    source,
                }
            })?;
        self.limit = Some(value.floor() as usize);
        Ok(self)
    }

    /// Accepts a percentage such as `"80%"`
    pub fn with_limit_total(mut self, limit_total: &str) -> Result<Self, FilterError> {
        let pct = limit_total.parse::<Percentage>().map_err(|e| match e {
            PercentageError::MissingSuffix => FilterError::invalid(
                "limitTotal",
                limit_total,
                "expected a percentage such as \"80%\"",
            ),
            PercentageError::Number(source) => FilterError::Number {
                option: "limitTotal",
                value: limit_total.to_string(),
                source,
            },
        })?;
        self.limit_total = Some(pct);
        Ok(self)
    }
}

/// Derive the bounded, ordered subset of `records` described by `options`
pub fn filter(records: &[VersionRecord], options: &FilterOptions) -> Vec<VersionRecord> {
    let total = sum_downloads(records);
    let min = options.min.map(|threshold| threshold.resolve(total));

    let mut selected: Vec<VersionRecord> = records
        .iter()
        .filter(|r| options.show_deprecated || !r.is_deprecated)
        .filter(|r| {
            options
                .semver_range
                .as_ref()
                .is_none_or(|range| range.satisfies(&r.version))
        })
        .filter(|r| min.is_none_or(|min| r.downloads as f64 >= min))
        .cloned()
        .collect();

    if let Some(key) = options.sort {
        selected.sort_by(|a, b| key.compare(a, b));
    }

    if let Some(limit) = options.limit {
        selected.truncate(limit);
    }

    if let Some(limit_total) = options.limit_total {
        selected = limit_by_total_downloads(selected, limit_total.of(total));
    }

    selected
}

/// Keep records while the downloads of the records before them stay within `required`.
///
/// The record that crosses the boundary is still included, so the result
/// may slightly exceed `required`.
pub fn limit_by_total_downloads(records: Vec<VersionRecord>, required: f64) -> Vec<VersionRecord> {
    let mut seen: u64 = 0;
    records
        .into_iter()
        .take_while(|r| {
            let include = seen as f64 <= required;
            seen = seen.saturating_add(r.downloads);
            include
        })
        .collect()
}
