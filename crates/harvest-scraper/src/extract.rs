//! Detail-page attribute extraction.
//!
//! Each attribute row is resolved by a strict cascade: filled score units,
//! then the selected choice, then the generic value element, then
//! [`AttributeValue::Unknown`]. Rows often carry leftover markup for more
//! than one format, so the order is significant.

use std::collections::BTreeMap;
use std::time::Duration;

use harvest_core::{AttributeValue, ItemRef, Record, SiteConfig, UNKNOWN_NAME};

use crate::driver::PageDriver;
use crate::error::{DriverError, ScraperError};
use crate::retry::{is_retriable, RetryPolicy};
use crate::settle::{wait_for_count_above, with_timeout, SettlePolicy};

/// Scrolls far enough for lazily rendered score bars to mount.
pub const NUDGE_SCROLL: &str = "window.scrollBy(0, 500);";

const RESERVED_SUFFIX: &str = " (attribute)";

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub navigation_timeout: Duration,
    pub settle: SettlePolicy,
    pub retry: RetryPolicy,
}

pub struct DetailExtractor<'a> {
    site: &'a SiteConfig,
    options: ExtractOptions,
}

impl<'a> DetailExtractor<'a> {
    #[must_use]
    pub fn new(site: &'a SiteConfig, options: ExtractOptions) -> Self {
        Self { site, options }
    }

    /// Navigates to `item` and builds its [`Record`].
    ///
    /// Navigation failures are retried per the configured [`RetryPolicy`].
    ///
    /// # Errors
    ///
    /// - [`ScraperError::DetailNavigationFailed`] if the page could not be
    ///   loaded within the navigation timeout, after all retries.
    /// - [`ScraperError::DetailExtractionFailed`] if a DOM query failed after
    ///   the page loaded.
    pub async fn extract<D: PageDriver>(
        &self,
        driver: &mut D,
        item: &ItemRef,
    ) -> Result<Record, ScraperError> {
        let retry = self.options.retry;
        let mut attempt = 0u32;

        loop {
            let err = match self.extract_once(driver, item).await {
                Ok(record) => return Ok(record),
                Err(err) => err,
            };
            if !is_retriable(&err) || attempt >= retry.max_retries {
                return Err(err);
            }

            let delay = retry.delay_for(attempt);
            tracing::warn!(
                url = %item,
                attempt,
                max_retries = retry.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "detail page failed to load; retrying after backoff"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn extract_once<D: PageDriver>(
        &self,
        driver: &mut D,
        item: &ItemRef,
    ) -> Result<Record, ScraperError> {
        with_timeout(
            "detail navigation",
            self.options.navigation_timeout,
            driver.navigate(item.as_str()),
        )
        .await
        .map_err(|source| ScraperError::DetailNavigationFailed {
            url: item.to_string(),
            source,
        })?;

        self.read_page(driver, item)
            .await
            .map_err(|source| ScraperError::DetailExtractionFailed {
                url: item.to_string(),
                source,
            })
    }

    async fn read_page<D: PageDriver>(
        &self,
        driver: &mut D,
        item: &ItemRef,
    ) -> Result<Record, DriverError> {
        let selectors = &self.site.selectors;
        let settle = self.options.settle;

        // A page without a heading spends the full settle timeout here before
        // the name falls back to "Unknown".
        wait_for_count_above(driver, &selectors.heading, 0, settle).await?;

        // Some attribute groups stay out of the DOM until the tab is opened.
        if let Some(tab) = driver.query_one(&selectors.show_all_tab).await? {
            driver.click(&tab).await?;
            if wait_for_count_above(driver, &selectors.attribute_row, 0, settle)
                .await?
                .is_none()
            {
                tracing::debug!(url = %item, "no attribute rows after expanding all attributes");
            }
        }

        driver.evaluate(NUDGE_SCROLL).await?;

        let name = self.read_name(driver).await?;

        let rows = driver.query_all(&selectors.attribute_row).await?;
        let mut attributes = BTreeMap::new();
        for row in &rows {
            let Some(label_el) = driver
                .query_one_within(row, &selectors.attribute_label)
                .await?
            else {
                continue;
            };
            let label = driver.inner_text(&label_el).await?.trim().to_owned();
            if label.is_empty() {
                continue;
            }

            let value = self.resolve_value(driver, row).await?;
            let label = self.unreserve(label, item);
            if attributes.insert(label, value).is_some() {
                tracing::debug!(url = %item, "duplicate attribute label; keeping last row");
            }
        }

        tracing::debug!(url = %item, name = %name, attributes = attributes.len(), "extracted item");
        Ok(Record {
            name,
            attributes,
            url: item.clone(),
        })
    }

    async fn read_name<D: PageDriver>(&self, driver: &mut D) -> Result<String, DriverError> {
        let Some(heading) = driver.query_one(&self.site.selectors.heading).await? else {
            return Ok(UNKNOWN_NAME.to_owned());
        };
        let text = driver.inner_text(&heading).await?;
        let text = text.trim();
        if text.is_empty() {
            Ok(UNKNOWN_NAME.to_owned())
        } else {
            Ok(text.to_owned())
        }
    }

    /// Resolves one attribute row's value by cascade precedence.
    ///
    /// # Errors
    ///
    /// Propagates any [`DriverError`] from the scoped queries.
    pub async fn resolve_value<D: PageDriver>(
        &self,
        driver: &mut D,
        row: &D::Element,
    ) -> Result<AttributeValue, DriverError> {
        let selectors = &self.site.selectors;

        let filled = driver
            .query_all_within(row, &selectors.score_unit_filled)
            .await?;
        if !filled.is_empty() {
            return Ok(AttributeValue::OrdinalScore {
                count: u32::try_from(filled.len()).unwrap_or(u32::MAX),
                max: self.site.score_max,
            });
        }

        if let Some(choice) = driver
            .query_one_within(row, &selectors.selected_choice)
            .await?
        {
            let text = driver.inner_text(&choice).await?;
            return Ok(AttributeValue::Choice(text.trim().to_owned()));
        }

        if let Some(value) = driver
            .query_one_within(row, &selectors.generic_value)
            .await?
        {
            let text = driver.inner_text(&value).await?;
            return Ok(AttributeValue::RawLabel(text.trim().to_owned()));
        }

        Ok(AttributeValue::Unknown)
    }

    /// Renames a label that would shadow the name or URL column.
    fn unreserve(&self, label: String, item: &ItemRef) -> String {
        if self.site.columns.is_reserved(&label) {
            let renamed = format!("{label}{RESERVED_SUFFIX}");
            tracing::warn!(
                url = %item,
                label = %label,
                renamed = %renamed,
                "attribute label collides with a reserved column"
            );
            renamed
        } else {
            label
        }
    }
}
