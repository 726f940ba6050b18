//! Unified column set across records with differing attribute labels.

use std::collections::BTreeSet;

use harvest_core::{ColumnNames, Record};

/// Ordered export columns: the name column, every attribute label seen in
/// any record sorted by ordinal string comparison, then the URL column.
///
/// An empty schema means there were no records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Projects `record` onto the column order. Missing attributes become
    /// empty cells.
    #[must_use]
    pub fn project(&self, record: &Record) -> Vec<String> {
        let last = self.columns.len().saturating_sub(1);
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                if idx == 0 {
                    record.name.clone()
                } else if idx == last {
                    record.url.to_string()
                } else {
                    record.cell(column).unwrap_or_default()
                }
            })
            .collect()
    }
}

/// Computes the schema for `records`. Pure and independent of record order.
#[must_use]
pub fn normalize_schema(records: &[Record], reserved: &ColumnNames) -> Schema {
    if records.is_empty() {
        return Schema::default();
    }

    let labels: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.attributes.keys().map(String::as_str))
        .collect();

    let mut columns = Vec::with_capacity(labels.len() + 2);
    columns.push(reserved.name.clone());
    columns.extend(labels.into_iter().map(str::to_owned));
    columns.push(reserved.url.clone());

    Schema { columns }
}
