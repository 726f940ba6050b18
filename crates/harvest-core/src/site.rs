//! Site-specific selectors and output layout, loaded from YAML.
//!
//! Everything that depends on the target site's DOM lives here so that a
//! markup change only touches `config/site.yaml`, never the pipeline.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::records::DEFAULT_SCORE_MAX;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Catalog listing page that hosts the item cards and load-more control.
    pub catalog_url: String,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default)]
    pub columns: ColumnNames,
    pub selectors: SiteSelectors,
    /// Number of units in a full ordinal score bar.
    #[serde(default = "default_score_max")]
    pub score_max: u32,
}

/// Header text for the two reserved columns that bracket the attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub name: String,
    pub url: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "name".to_owned(),
            url: "url".to_owned(),
        }
    }
}

impl ColumnNames {
    #[must_use]
    pub fn is_reserved(&self, label: &str) -> bool {
        label == self.name || label == self.url
    }
}

/// CSS selectors (and one visible-text probe) for the target site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Item-card title element; its enclosing link is the detail URL.
    pub item_card: String,
    /// Visible text of the "load more" control, matched case-insensitively.
    pub load_more_text: String,
    pub heading: String,
    /// Control that expands hidden attribute groups on the detail page.
    pub show_all_tab: String,
    pub attribute_row: String,
    pub attribute_label: String,
    pub score_unit_filled: String,
    pub selected_choice: String,
    pub generic_value: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("catalog_attributes.csv")
}

fn default_score_max() -> u32 {
    DEFAULT_SCORE_MAX
}

/// Load and validate the site configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_site(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SiteFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_site(&content)
}

/// Parse and validate site configuration from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text cannot be parsed or fails validation.
pub fn parse_site(content: &str) -> Result<SiteConfig, ConfigError> {
    let site: SiteConfig = serde_yaml::from_str(content)?;
    validate_site(&site)?;
    Ok(site)
}

fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    let url = site.catalog_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Validation(format!(
            "catalog_url must be an http(s) URL, got '{}'",
            site.catalog_url
        )));
    }

    let s = &site.selectors;
    let named = [
        ("item_card", &s.item_card),
        ("load_more_text", &s.load_more_text),
        ("heading", &s.heading),
        ("show_all_tab", &s.show_all_tab),
        ("attribute_row", &s.attribute_row),
        ("attribute_label", &s.attribute_label),
        ("score_unit_filled", &s.score_unit_filled),
        ("selected_choice", &s.selected_choice),
        ("generic_value", &s.generic_value),
    ];
    for (field, value) in named {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{field}' must be non-empty"
            )));
        }
    }

    let mut seen = HashSet::new();
    for column in [&site.columns.name, &site.columns.url] {
        if column.trim().is_empty() {
            return Err(ConfigError::Validation(
                "column names must be non-empty".to_string(),
            ));
        }
        if !seen.insert(column.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate column name: '{column}'"
            )));
        }
    }

    if site.score_max == 0 {
        return Err(ConfigError::Validation(
            "score_max must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "site_test.rs"]
mod tests;
