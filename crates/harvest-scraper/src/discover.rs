//! Catalog discovery behind a "load more" pagination control.
//!
//! The loop scrolls to the bottom, probes the control, clicks it, and waits
//! for new item cards until the control disappears. Every way the loop can
//! end, including driver errors, leads to the same final harvest of whatever
//! cards are rendered at that point. The harvest pass is the only source of
//! the returned item list; nothing is accumulated while looping.

use std::time::Duration;

use harvest_core::{ItemRef, SiteConfig};

use crate::driver::PageDriver;
use crate::error::{DriverError, ScraperError};
use crate::settle::{wait_for_count_above, with_timeout, SettlePolicy};

pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

#[derive(Debug, Clone, Copy)]
pub struct DiscoveryOptions {
    /// Upper bound on load-more activations.
    pub max_load_more: usize,
    pub navigation_timeout: Duration,
    pub settle: SettlePolicy,
}

/// Why the pagination loop stopped. All variants mean "fully loaded".
#[derive(Debug)]
pub enum StopReason {
    /// The load-more control is absent or hidden.
    Exhausted,
    /// `max_load_more` activations were performed.
    IterationCap,
    /// Probing, clicking or navigating raised an error.
    Interrupted(ScraperError),
}

#[derive(Debug)]
pub struct LoadReport {
    pub activations: usize,
    pub stop: StopReason,
}

pub struct CatalogDiscoverer<'a> {
    site: &'a SiteConfig,
    options: DiscoveryOptions,
}

impl<'a> CatalogDiscoverer<'a> {
    #[must_use]
    pub fn new(site: &'a SiteConfig, options: DiscoveryOptions) -> Self {
        Self { site, options }
    }

    /// Loads the full catalog and returns every rendered item's detail URL.
    ///
    /// Never fails: pagination errors end the loop early and the items
    /// already on the page are returned. Duplicates are passed through.
    pub async fn discover<D: PageDriver>(&self, driver: &mut D) -> Vec<ItemRef> {
        let report = self.load_all(driver).await;
        match &report.stop {
            StopReason::Exhausted => {
                tracing::info!(
                    activations = report.activations,
                    "no more load-more controls; catalog fully loaded"
                );
            }
            StopReason::IterationCap => {
                tracing::warn!(
                    activations = report.activations,
                    max_load_more = self.options.max_load_more,
                    "load-more iteration cap reached; harvesting what is rendered"
                );
            }
            StopReason::Interrupted(err) => {
                tracing::warn!(
                    activations = report.activations,
                    error = %err,
                    "collection interrupted; harvesting what is rendered"
                );
            }
        }
        self.harvest(driver).await
    }

    /// Runs the pagination loop to a terminal state.
    pub async fn load_all<D: PageDriver>(&self, driver: &mut D) -> LoadReport {
        let mut activations = 0usize;
        let stop = match self.paginate(driver, &mut activations).await {
            Ok(stop) => stop,
            Err(source) => StopReason::Interrupted(ScraperError::DiscoveryInterrupted { source }),
        };
        LoadReport { activations, stop }
    }

    async fn paginate<D: PageDriver>(
        &self,
        driver: &mut D,
        activations: &mut usize,
    ) -> Result<StopReason, DriverError> {
        let selectors = &self.site.selectors;
        let settle = self.options.settle;

        tracing::info!(url = %self.site.catalog_url, "opening catalog page");
        with_timeout(
            "catalog navigation",
            self.options.navigation_timeout,
            driver.navigate(&self.site.catalog_url),
        )
        .await?;
        wait_for_count_above(driver, &selectors.item_card, 0, settle).await?;

        loop {
            driver.evaluate(SCROLL_TO_BOTTOM).await?;

            let Some(control) = driver.find_by_text(&selectors.load_more_text).await? else {
                return Ok(StopReason::Exhausted);
            };
            if !driver.is_visible(&control).await? {
                return Ok(StopReason::Exhausted);
            }
            if *activations >= self.options.max_load_more {
                return Ok(StopReason::IterationCap);
            }

            let before = driver.query_all(&selectors.item_card).await?.len();
            tracing::info!(rendered = before, "found load-more control; clicking");
            driver.click(&control).await?;
            *activations += 1;

            // A settle timeout only ends the wait; the control is probed again.
            match wait_for_count_above(driver, &selectors.item_card, before, settle).await? {
                Some(after) => tracing::debug!(before, after, "new item cards rendered"),
                None => tracing::debug!(
                    rendered = before,
                    "no new item cards within settle timeout; probing again"
                ),
            }
        }
    }

    /// Single pass over the rendered item cards.
    ///
    /// A card whose link cannot be resolved is skipped; the rest are kept.
    pub async fn harvest<D: PageDriver>(&self, driver: &mut D) -> Vec<ItemRef> {
        let cards = match driver.query_all(&self.site.selectors.item_card).await {
            Ok(cards) => cards,
            Err(e) => {
                tracing::warn!(error = %e, "could not query item cards");
                return Vec::new();
            }
        };

        let mut items = Vec::with_capacity(cards.len());
        let mut failed = 0usize;
        for (index, card) in cards.iter().enumerate() {
            match driver.enclosing_href(card).await {
                Ok(Some(href)) if !href.trim().is_empty() => items.push(ItemRef::new(href)),
                Ok(_) => tracing::debug!(card = index, "item card has no enclosing link; skipping"),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(card = index, error = %e, "could not resolve item link; skipping");
                }
            }
        }

        tracing::info!(count = items.len(), failed, "total items to scrape");
        items
    }
}
