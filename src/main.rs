use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use version_stats::cli::Cli;
use version_stats::config::{Config, config_path};
use version_stats::report::{render_summary, render_table};
use version_stats::stats::fetch::fetch;
use version_stats::stats::filter::filter;
use version_stats::stats::registry::NpmWebsite;
use version_stats::stats::types::sum_downloads;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_file = cli.config.clone().unwrap_or_else(config_path);
    let config = Config::load(&config_file)?;
    let options = cli.filter_options(&config)?;
    let website = NpmWebsite::new(
        cli.base_url(&config),
        Duration::from_millis(config.registry.timeout_ms),
    )?;

    if !cli.json {
        println!("Loading stats for {}", cli.package_name);
    }

    let records = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(fetch(&website, &cli.package_name))
        .with_context(|| format!("Failed to load stats for {}", cli.package_name))?;

    let total = sum_downloads(&records);
    let selected = filter(&records, &options);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else {
        print!("{}", render_table(&selected, total));
        print!("{}", render_summary(&selected, total));
    }

    Ok(())
}
