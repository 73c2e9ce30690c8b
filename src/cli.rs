//! Command line interface

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::stats::error::FilterError;
use crate::stats::filter::FilterOptions;

#[derive(Debug, Parser)]
#[command(name = "version-stats")]
#[command(version, about = "Weekly download statistics per version of an npm package")]
pub struct Cli {
    /// Package to inspect (e.g. "react" or "@types/node")
    #[arg(value_name = "PACKAGE")]
    pub package_name: String,

    /// Only show versions satisfying this semver range (e.g. "^1.2.0 || 2.x")
    #[arg(value_name = "RANGE")]
    pub semver_range: Option<String>,

    /// Show at most N versions
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub limit: Option<String>,

    /// Hide versions with fewer downloads, absolute ("12") or share of total ("10%")
    #[arg(long, value_name = "N|N%", allow_hyphen_values = true)]
    pub min: Option<String>,

    /// Show versions until they cover this share of all downloads (e.g. "90%")
    #[arg(
        long = "limit-total",
        visible_alias = "limitTotal",
        value_name = "N%",
        allow_hyphen_values = true
    )]
    pub limit_total: Option<String>,

    /// Sort by "downloads", "time" or "version"; "false" keeps page order
    #[arg(long, value_name = "KEY")]
    pub sort: Option<String>,

    /// Include deprecated versions (default)
    #[arg(long, visible_alias = "show-deprecated", overrides_with = "no_deprecated")]
    pub deprecated: bool,

    /// Exclude deprecated versions
    #[arg(long, overrides_with = "deprecated")]
    pub no_deprecated: bool,

    /// Print the selected versions as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the npm website
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,
}

impl Cli {
    /// Build validated filter options, falling back to config defaults for absent flags
    pub fn filter_options(&self, config: &Config) -> Result<FilterOptions, FilterError> {
        let defaults = &config.defaults;
        let show_deprecated = match (self.deprecated, self.no_deprecated) {
            (_, true) => false,
            (true, _) => true,
            (false, false) => defaults.show_deprecated,
        };

        let mut options = FilterOptions::default().show_deprecated(show_deprecated);

        if let Some(range) = &self.semver_range {
            options = options.with_semver_range(range)?;
        }
        if let Some(min) = self.min.as_deref().or(defaults.min.as_deref()) {
            options = options.with_min(min)?;
        }
        if let Some(sort) = self.sort.as_deref().or(defaults.sort.as_deref()) {
            options = options.with_sort(sort)?;
        }
        if let Some(limit) = self.limit.as_deref().or(defaults.limit.as_deref()) {
            options = options.with_limit(limit)?;
        }
        if let Some(limit_total) = self
            .limit_total
            .as_deref()
            .or(defaults.limit_total.as_deref())
        {
            options = options.with_limit_total(limit_total)?;
        }

        Ok(options)
    }

    /// Base URL from the flag, else from the config file
    pub fn base_url<'a>(&'a self, config: &'a Config) -> &'a str {
        self.registry
            .as_deref()
            .unwrap_or(&config.registry.base_url)
    }
}
