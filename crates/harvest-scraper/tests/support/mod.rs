//! In-memory [`PageDriver`] used by the integration tests.
//!
//! Models one catalog page with a load-more control and a set of detail
//! pages. State lives behind an `Arc<Mutex<_>>` so tests can inspect it after
//! the driver has been moved into the pipeline.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use harvest_core::{ColumnNames, SiteConfig, SiteSelectors};
use harvest_scraper::{
    DiscoveryOptions, DriverError, ExtractOptions, PageDriver, PipelineOptions, RetryPolicy,
    SettlePolicy,
};

pub const CATALOG_URL: &str = "https://catalog.test/items/";

pub fn site() -> SiteConfig {
    SiteConfig {
        catalog_url: CATALOG_URL.to_owned(),
        output_path: PathBuf::from("unused.csv"),
        columns: ColumnNames {
            name: "Breed Name".to_owned(),
            url: "URL".to_owned(),
        },
        selectors: SiteSelectors {
            item_card: "h3.card__title".to_owned(),
            load_more_text: "LOAD MORE".to_owned(),
            heading: "h1".to_owned(),
            show_all_tab: "#tab-all".to_owned(),
            attribute_row: ".trait".to_owned(),
            attribute_label: ".trait__header".to_owned(),
            score_unit_filled: ".score-unit--filled".to_owned(),
            selected_choice: ".choice--selected".to_owned(),
            generic_value: ".score-label".to_owned(),
        },
        score_max: 5,
    }
}

pub fn fast_settle() -> SettlePolicy {
    SettlePolicy {
        timeout: Duration::from_millis(20),
        interval: Duration::from_millis(1),
    }
}

pub fn discovery_options(max_load_more: usize) -> DiscoveryOptions {
    DiscoveryOptions {
        max_load_more,
        navigation_timeout: Duration::from_secs(5),
        settle: fast_settle(),
    }
}

pub fn extract_options(retry: RetryPolicy) -> ExtractOptions {
    ExtractOptions {
        navigation_timeout: Duration::from_secs(5),
        settle: fast_settle(),
        retry,
    }
}

pub fn pipeline_options() -> PipelineOptions {
    PipelineOptions {
        discovery: discovery_options(100),
        extract: extract_options(RetryPolicy::default()),
        dedupe_urls: false,
    }
}

pub fn item_url(n: usize) -> String {
    format!("https://catalog.test/items/item-{n}/")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeElement {
    Card(usize),
    LoadMore,
    Heading,
    ShowAllTab,
    Row(usize),
    Label(usize),
    Filled(usize, usize),
    Choice(usize),
    Generic(usize),
}

#[derive(Debug, Clone, Default)]
pub struct FakeRow {
    pub label: Option<String>,
    pub filled: usize,
    pub choice: Option<String>,
    pub generic: Option<String>,
}

impl FakeRow {
    pub fn labeled(label: &str) -> Self {
        Self {
            label: Some(label.to_owned()),
            ..Self::default()
        }
    }

    pub fn filled(mut self, units: usize) -> Self {
        self.filled = units;
        self
    }

    pub fn choice(mut self, text: &str) -> Self {
        self.choice = Some(text.to_owned());
        self
    }

    pub fn generic(mut self, text: &str) -> Self {
        self.generic = Some(text.to_owned());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub heading: Option<String>,
    pub show_all_tab: bool,
    pub rows: Vec<FakeRow>,
    /// Rows that only render after the show-all tab is clicked.
    pub hidden_rows: Vec<FakeRow>,
}

impl FakePage {
    pub fn titled(heading: &str) -> Self {
        Self {
            heading: Some(heading.to_owned()),
            ..Self::default()
        }
    }

    pub fn row(mut self, row: FakeRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn hidden_row(mut self, row: FakeRow) -> Self {
        self.show_all_tab = true;
        self.hidden_rows.push(row);
        self
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub catalog_items: Vec<String>,
    pub rendered: usize,
    pub cards_per_click: usize,
    /// Number of probes for which the load-more control is present.
    pub load_more_available: usize,
    pub load_more_hidden: bool,
    /// 1-based probe number that raises instead of answering.
    pub probe_fails_on: Option<usize>,
    pub catalog_unreachable: bool,
    /// 0-based card indices whose link lookup raises.
    pub href_fails_on: Vec<usize>,
    pub pages: HashMap<String, FakePage>,
    /// URL → remaining navigation failures.
    pub failing_urls: HashMap<String, usize>,
    /// URL → page that loads but fails on the first row query.
    pub broken_pages: Vec<String>,

    pub current: Option<String>,
    pub tab_clicked: bool,
    pub probes: usize,
    pub load_more_clicks: usize,
    pub tab_clicks: usize,
    pub scripts: Vec<String>,
    pub navigations: Vec<String>,
    pub closes: usize,
}

impl FakeState {
    fn on_catalog(&self) -> bool {
        self.current.as_deref() == Some(CATALOG_URL)
    }

    fn page(&self) -> Option<&FakePage> {
        self.current.as_ref().and_then(|url| self.pages.get(url))
    }

    fn visible_rows(&self) -> Vec<FakeRow> {
        let Some(page) = self.page() else {
            return Vec::new();
        };
        let mut rows = page.rows.clone();
        if self.tab_clicked {
            rows.extend(page.hidden_rows.iter().cloned());
        }
        rows
    }
}

#[derive(Clone)]
pub struct FakeDriver {
    selectors: SiteSelectors,
    state: Arc<Mutex<FakeState>>,
}

impl FakeDriver {
    pub fn new(state: FakeState) -> Self {
        Self {
            selectors: site().selectors,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Catalog of `total` items showing `initial` cards, revealing
    /// `per_click` more per activation while the control is present
    /// `clicks` times.
    pub fn catalog(total: usize, initial: usize, per_click: usize, clicks: usize) -> Self {
        Self::new(FakeState {
            catalog_items: (1..=total).map(item_url).collect(),
            rendered: initial.min(total),
            cards_per_click: per_click,
            load_more_available: clicks,
            ..FakeState::default()
        })
    }

    /// Detail pages only, keyed by URL.
    pub fn with_pages(pages: Vec<(String, FakePage)>) -> Self {
        Self::new(FakeState {
            pages: pages.into_iter().collect(),
            ..FakeState::default()
        })
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake driver state poisoned")
    }

    pub fn handle(&self) -> Arc<Mutex<FakeState>> {
        Arc::clone(&self.state)
    }

    fn select(&self, selector: &str) -> Vec<FakeElement> {
        let state = self.state();
        let s = &self.selectors;
        if selector == s.item_card {
            if state.on_catalog() {
                return (0..state.rendered).map(FakeElement::Card).collect();
            }
            return Vec::new();
        }
        let Some(page) = state.page() else {
            return Vec::new();
        };
        if selector == s.heading {
            return page.heading.iter().map(|_| FakeElement::Heading).collect();
        }
        if selector == s.show_all_tab {
            return if page.show_all_tab {
                vec![FakeElement::ShowAllTab]
            } else {
                Vec::new()
            };
        }
        if selector == s.attribute_row {
            return (0..state.visible_rows().len()).map(FakeElement::Row).collect();
        }
        Vec::new()
    }

    fn select_within(&self, scope: &FakeElement, selector: &str) -> Vec<FakeElement> {
        let FakeElement::Row(idx) = *scope else {
            return Vec::new();
        };
        let state = self.state();
        let rows = state.visible_rows();
        let Some(row) = rows.get(idx) else {
            return Vec::new();
        };
        let s = &self.selectors;
        if selector == s.attribute_label {
            row.label.iter().map(|_| FakeElement::Label(idx)).collect()
        } else if selector == s.score_unit_filled {
            (0..row.filled).map(|u| FakeElement::Filled(idx, u)).collect()
        } else if selector == s.selected_choice {
            row.choice.iter().map(|_| FakeElement::Choice(idx)).collect()
        } else if selector == s.generic_value {
            row.generic.iter().map(|_| FakeElement::Generic(idx)).collect()
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    type Element = FakeElement;

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state();
        state.navigations.push(url.to_owned());
        if let Some(remaining) = state.failing_urls.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DriverError::Command(format!("net::ERR_TIMED_OUT at {url}")));
            }
        }
        if url == CATALOG_URL {
            if state.catalog_unreachable {
                return Err(DriverError::Command("net::ERR_CONNECTION_REFUSED".to_owned()));
            }
        } else if !state.pages.contains_key(url) {
            return Err(DriverError::Command(format!("404 for {url}")));
        }
        state.current = Some(url.to_owned());
        state.tab_clicked = false;
        Ok(())
    }

    async fn query_all(&mut self, selector: &str) -> Result<Vec<FakeElement>, DriverError> {
        if selector == self.selectors.attribute_row {
            let state = self.state();
            if let Some(current) = &state.current {
                if state.broken_pages.contains(current) {
                    return Err(DriverError::Command("stale element reference".to_owned()));
                }
            }
        }
        Ok(self.select(selector))
    }

    async fn query_one(&mut self, selector: &str) -> Result<Option<FakeElement>, DriverError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all_within(
        &mut self,
        scope: &FakeElement,
        selector: &str,
    ) -> Result<Vec<FakeElement>, DriverError> {
        Ok(self.select_within(scope, selector))
    }

    async fn query_one_within(
        &mut self,
        scope: &FakeElement,
        selector: &str,
    ) -> Result<Option<FakeElement>, DriverError> {
        Ok(self.select_within(scope, selector).into_iter().next())
    }

    async fn find_by_text(&mut self, text: &str) -> Result<Option<FakeElement>, DriverError> {
        let mut state = self.state();
        state.probes += 1;
        if state.probe_fails_on == Some(state.probes) {
            return Err(DriverError::Command("element is not attached".to_owned()));
        }
        let matches = text.eq_ignore_ascii_case(&self.selectors.load_more_text);
        if matches && state.on_catalog() && state.load_more_clicks < state.load_more_available {
            Ok(Some(FakeElement::LoadMore))
        } else {
            Ok(None)
        }
    }

    async fn is_visible(&mut self, element: &FakeElement) -> Result<bool, DriverError> {
        let state = self.state();
        Ok(!(*element == FakeElement::LoadMore && state.load_more_hidden))
    }

    async fn click(&mut self, element: &FakeElement) -> Result<(), DriverError> {
        let mut state = self.state();
        match element {
            FakeElement::LoadMore => {
                state.load_more_clicks += 1;
                state.rendered = (state.rendered + state.cards_per_click).min(state.catalog_items.len());
            }
            FakeElement::ShowAllTab => {
                state.tab_clicks += 1;
                state.tab_clicked = true;
            }
            _ => {}
        }
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, DriverError> {
        self.state().scripts.push(script.to_owned());
        Ok(serde_json::Value::Null)
    }

    async fn inner_text(&mut self, element: &FakeElement) -> Result<String, DriverError> {
        let state = self.state();
        let rows = state.visible_rows();
        let text = match element {
            FakeElement::Heading => state.page().and_then(|p| p.heading.clone()),
            FakeElement::Label(i) => rows.get(*i).and_then(|r| r.label.clone()),
            FakeElement::Choice(i) => rows.get(*i).and_then(|r| r.choice.clone()),
            FakeElement::Generic(i) => rows.get(*i).and_then(|r| r.generic.clone()),
            FakeElement::LoadMore => Some("Load More".to_owned()),
            _ => None,
        };
        Ok(text.unwrap_or_default())
    }

    async fn enclosing_href(&mut self, element: &FakeElement) -> Result<Option<String>, DriverError> {
        let state = self.state();
        match element {
            FakeElement::Card(i) if state.href_fails_on.contains(i) => {
                Err(DriverError::Command("stale element reference".to_owned()))
            }
            FakeElement::Card(i) => Ok(state.catalog_items.get(*i).cloned()),
            _ => Ok(None),
        }
    }

    async fn close(self) -> Result<(), DriverError> {
        self.state().closes += 1;
        Ok(())
    }
}
