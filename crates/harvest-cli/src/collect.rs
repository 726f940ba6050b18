//! Command handlers for the CLI.
//!
//! Per-item failures never reach this layer; the pipeline absorbs them and
//! reports counts in its [`RunOutcome`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use harvest_core::{AppConfig, SiteConfig};
use harvest_scraper::{
    run_pipeline, CsvFileExporter, PipelineOptions, RunOutcome, WebDriverSession,
};

/// Resolve the site file from the `--site` flag, falling back to config.
fn site_path<'a>(config: &'a AppConfig, flag: Option<&'a Path>) -> &'a Path {
    flag.unwrap_or(config.site_path.as_path())
}

/// Resolve the CSV destination from the `--output` flag, falling back to the
/// site definition.
fn output_path(site: &SiteConfig, flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(|| site.output_path.clone(), Path::to_path_buf)
}

fn load_site(path: &Path) -> anyhow::Result<SiteConfig> {
    harvest_core::load_site(path)
        .with_context(|| format!("failed to load site definition {}", path.display()))
}

/// Run the full harvest and write the CSV.
///
/// # Errors
///
/// Returns an error if the site file is invalid, the browser session cannot
/// be started, or the CSV cannot be written. An empty catalog is not an error.
pub(crate) async fn run_collect(
    config: &AppConfig,
    site_flag: Option<&Path>,
    output_flag: Option<&Path>,
) -> anyhow::Result<()> {
    let site = load_site(site_path(config, site_flag))?;
    let output = output_path(&site, output_flag);
    let options = PipelineOptions::from_app_config(config);

    tracing::info!(
        env = %config.env,
        catalog = %site.catalog_url,
        output = %output.display(),
        "starting harvest"
    );

    let session = WebDriverSession::connect(&config.webdriver_url, config.headless)
        .await
        .context("could not start browser session")?;
    let mut exporter = CsvFileExporter::new(&output);

    let outcome = run_pipeline(session, &site, &options, &mut exporter).await?;
    println!("{}", summary_line(&outcome, &output));
    Ok(())
}

/// Validate a site definition and print what it would scrape.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub(crate) fn run_check_site(config: &AppConfig, site_flag: Option<&Path>) -> anyhow::Result<()> {
    let path = site_path(config, site_flag);
    let site = load_site(path)?;
    println!("site definition {} is valid", path.display());
    println!("  catalog:     {}", site.catalog_url);
    println!("  output:      {}", site.output_path.display());
    println!("  name column: {}", site.columns.name);
    println!("  url column:  {}", site.columns.url);
    println!("  score max:   {}", site.score_max);
    Ok(())
}

pub(crate) fn summary_line(outcome: &RunOutcome, output: &Path) -> String {
    match outcome {
        RunOutcome::Exported {
            records,
            columns,
            discovered,
            failed,
        } => format!(
            "DONE! {records} records ({columns} columns) saved to {}; \
             {discovered} discovered, {failed} skipped",
            output.display()
        ),
        RunOutcome::EmptyCatalog { discovered, failed } => format!(
            "nothing to export: {discovered} discovered, {failed} skipped"
        ),
    }
}
