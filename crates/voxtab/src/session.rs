//! Session context: exclusive owner of the dataset.
//!
//! Replaces any global mutable table. The classifier and executor get
//! what they need from here, which keeps both testable without a live
//! capture or feedback collaborator.

use std::path::Path;

use anyhow::Result;

use crate::table::Table;

pub struct Session {
    table: Table,
    name_column: String,
}

impl Session {
    pub fn new(table: Table, name_column: impl Into<String>) -> Self {
        Self {
            table,
            name_column: name_column.into(),
        }
    }

    /// Load the dataset once at startup; text columns are normalized
    /// (trim + lowercase) during the load.
    pub fn from_csv(path: &Path, name_column: impl Into<String>) -> Result<Self> {
        Ok(Self::new(Table::load_csv(path)?, name_column))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// Distinct values of the configured entity-name column, used by
    /// the classifier for name extraction. Empty when the column is
    /// absent or non-text.
    pub fn known_names(&self) -> Vec<String> {
        self.table.text_values(&self.name_column)
    }
}
