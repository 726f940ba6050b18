//! Item references and extracted per-item records.
//!
//! An [`ItemRef`] is produced once by catalog discovery and consumed once by
//! detail extraction, which turns it into a [`Record`]. Attribute label sets
//! differ between records; the exporter reconciles them through a schema.

use std::collections::BTreeMap;
use std::fmt;

/// Display name used when a detail page has no primary heading.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Default number of units in an ordinal score bar.
pub const DEFAULT_SCORE_MAX: u32 = 5;

/// Opaque detail-page URL discovered on the catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemRef(String);

impl ItemRef {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemRef {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl From<&str> for ItemRef {
    fn from(url: &str) -> Self {
        Self(url.to_owned())
    }
}

/// One attribute value, tagged by the presentation format it was read from.
///
/// Variants are listed in extraction priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Count of filled indicator units out of `max`.
    OrdinalScore { count: u32, max: u32 },
    /// Text of the selected option among a discrete set.
    Choice(String),
    /// Text of a plain label/value element.
    RawLabel(String),
    /// None of the known representations were present.
    Unknown,
}

impl AttributeValue {
    /// Cell text written to the exported table.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::OrdinalScore { count, max } => write!(f, "{count} out of {max}"),
            AttributeValue::Choice(text) | AttributeValue::RawLabel(text) => f.write_str(text),
            AttributeValue::Unknown => f.write_str("N/A"),
        }
    }
}

/// A fully extracted item. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub url: ItemRef,
}

impl Record {
    /// Rendered value for `label`, or `None` when this item lacks it.
    #[must_use]
    pub fn cell(&self, label: &str) -> Option<String> {
        self.attributes.get(label).map(AttributeValue::render)
    }
}
