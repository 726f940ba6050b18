//! End-to-end run: discover → extract → normalize → export.
//!
//! Each stage returns its result to the next; there is no shared mutable
//! state. The browser session is owned here and closed exactly once, on
//! every exit path.

use std::collections::HashSet;
use std::time::Duration;

use harvest_core::{AppConfig, ItemRef, Record, SiteConfig};

use crate::discover::{CatalogDiscoverer, DiscoveryOptions};
use crate::driver::PageDriver;
use crate::error::ScraperError;
use crate::export::Exporter;
use crate::extract::{DetailExtractor, ExtractOptions};
use crate::retry::RetryPolicy;
use crate::schema::normalize_schema;
use crate::settle::SettlePolicy;

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub discovery: DiscoveryOptions,
    pub extract: ExtractOptions,
    /// Drop repeated item URLs before extraction (first occurrence wins).
    pub dedupe_urls: bool,
}

impl PipelineOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);
        let settle = SettlePolicy::from_millis(config.settle_timeout_ms, config.poll_interval_ms);
        Self {
            discovery: DiscoveryOptions {
                max_load_more: config.max_load_more,
                navigation_timeout,
                settle,
            },
            extract: ExtractOptions {
                navigation_timeout,
                settle,
                retry: RetryPolicy::new(config.item_retries, config.retry_backoff_ms),
            },
            dedupe_urls: config.dedupe_urls,
        }
    }
}

/// How a run ended. Neither variant is a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Exported {
        records: usize,
        columns: usize,
        discovered: usize,
        failed: usize,
    },
    /// No item was discovered or none extracted successfully; the exporter
    /// was not invoked.
    EmptyCatalog { discovered: usize, failed: usize },
}

/// Runs the whole pipeline against `driver`, then closes it.
///
/// Per-item and discovery errors are absorbed; see [`RunOutcome`].
///
/// # Errors
///
/// Returns [`ScraperError::Export`] if the exporter fails. A failure to close
/// the session is logged, not returned.
pub async fn run_pipeline<D, E>(
    driver: D,
    site: &SiteConfig,
    options: &PipelineOptions,
    exporter: &mut E,
) -> Result<RunOutcome, ScraperError>
where
    D: PageDriver,
    E: Exporter + ?Sized,
{
    let mut driver = driver;
    let result = harvest(&mut driver, site, options, exporter).await;
    if let Err(e) = driver.close().await {
        tracing::warn!(error = %e, "failed to close browser session");
    }
    result
}

async fn harvest<D, E>(
    driver: &mut D,
    site: &SiteConfig,
    options: &PipelineOptions,
    exporter: &mut E,
) -> Result<RunOutcome, ScraperError>
where
    D: PageDriver,
    E: Exporter + ?Sized,
{
    tracing::info!("stage 1: loading catalog until all items are found");
    let discoverer = CatalogDiscoverer::new(site, options.discovery);
    let mut items = discoverer.discover(driver).await;
    let discovered = items.len();

    if options.dedupe_urls {
        items = dedupe_item_refs(items);
        if items.len() < discovered {
            tracing::info!(
                discovered,
                unique = items.len(),
                "dropped duplicate item URLs"
            );
        }
    }

    tracing::info!(total = items.len(), "stage 2: scraping item details");
    let extractor = DetailExtractor::new(site, options.extract);
    let (records, failed) = extract_all(driver, &extractor, &items).await;

    let schema = normalize_schema(&records, &site.columns);
    if schema.is_empty() {
        tracing::warn!(discovered, failed, "nothing to export");
        return Ok(RunOutcome::EmptyCatalog { discovered, failed });
    }

    tracing::info!(
        records = records.len(),
        columns = schema.len(),
        "stage 3: writing export"
    );
    exporter.export(&schema, &records)?;

    Ok(RunOutcome::Exported {
        records: records.len(),
        columns: schema.len(),
        discovered,
        failed,
    })
}

/// Extracts every item in order, skipping the ones that fail.
///
/// Returns the records in completion order and the number of skipped items.
pub async fn extract_all<D: PageDriver>(
    driver: &mut D,
    extractor: &DetailExtractor<'_>,
    items: &[ItemRef],
) -> (Vec<Record>, usize) {
    let total = items.len();
    let mut records = Vec::with_capacity(total);
    let mut failed = 0usize;

    for (index, item) in items.iter().enumerate() {
        tracing::info!(item = index + 1, total, url = %item, "scraping");
        match extractor.extract(driver, item).await {
            Ok(record) => records.push(record),
            Err(e) => {
                failed += 1;
                tracing::warn!(url = %item, error = %e, "skipping item");
            }
        }
    }

    (records, failed)
}

/// Removes repeated URLs, keeping the first occurrence of each.
#[must_use]
pub fn dedupe_item_refs(items: Vec<ItemRef>) -> Vec<ItemRef> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
