//! In-memory table store.
//!
//! Owns the session dataset: typed columns, insertion-ordered rows.
//! Text normalization (trim + lowercase) happens exactly once, at load.
//! Read paths copy; only cleaning operations mutate in place.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Int(i64),
    Real(f64),
    Date(NaiveDate),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view for Int/Real cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Real(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Real(x) => write!(f, "{}", x),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Null => Ok(()),
        }
    }
}

/// Inferred semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Int,
    Real,
    Date,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

/// Mutable, named-column, row-ordered table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

const DATE_FORMAT: &str = "%Y-%m-%d";

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. The cell count must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Distinct non-null text values of a column, in first-seen order.
    /// Used for entity-name extraction against the utterance.
    pub fn text_values(&self, name: &str) -> Vec<String> {
        let Some(idx) = self.column_index(name) else {
            return Vec::new();
        };
        let mut seen = Vec::new();
        for row in &self.rows {
            if let Value::Text(s) = &row[idx] {
                if !seen.contains(s) {
                    seen.push(s.clone());
                }
            }
        }
        seen
    }

    /// Load a CSV dataset, infer column types, and normalize text cells
    /// (trim + lowercase) once. Empty cells become Null.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open dataset {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .context("dataset has no header row")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("malformed record in {}", path.display()))?;
            raw_rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| Column {
                name: name.clone(),
                ty: infer_column_type(raw_rows.iter().map(|r| r[i].as_str())),
            })
            .collect();

        let mut table = Table::new(columns);
        for raw in raw_rows {
            let row = raw
                .iter()
                .enumerate()
                .map(|(i, cell)| parse_cell(cell, table.columns[i].ty))
                .collect();
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Copying filter; never mutates the stored table.
    pub fn filtered<F>(&self, predicate: F) -> Table
    where
        F: Fn(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Destructive in-place filter, for cleaning operations.
    pub fn retain_rows<F>(&mut self, predicate: F)
    where
        F: Fn(&[Value]) -> bool,
    {
        self.rows.retain(|r| predicate(r));
    }

    /// Drop rows that exactly duplicate an earlier row; keep the first.
    pub fn drop_duplicates(&mut self) {
        let mut seen: Vec<Vec<Value>> = Vec::with_capacity(self.rows.len());
        self.rows.retain(|row| {
            if seen.contains(row) {
                false
            } else {
                seen.push(row.clone());
                true
            }
        });
    }

    /// Trim leading/trailing whitespace in every text cell. Idempotent.
    pub fn trim_whitespace(&mut self) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                if let Value::Text(s) = cell {
                    let trimmed = s.trim();
                    if trimmed.len() != s.len() {
                        *cell = Value::Text(trimmed.to_string());
                    }
                }
            }
        }
    }

    /// Impute nulls in numeric columns with the column mean.
    /// Int columns round to the nearest integer; columns with no
    /// non-null cells are left alone.
    pub fn fill_missing_mean(&mut self) {
        for (idx, col) in self.columns.clone().iter().enumerate() {
            if !matches!(col.ty, ColumnType::Int | ColumnType::Real) {
                continue;
            }
            let (sum, count) = self
                .rows
                .iter()
                .filter_map(|r| r[idx].as_f64())
                .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
            if count == 0 {
                continue;
            }
            let mean = sum / count as f64;
            let fill = match col.ty {
                ColumnType::Int => Value::Int(mean.round() as i64),
                _ => Value::Real(mean),
            };
            for row in &mut self.rows {
                if row[idx].is_null() {
                    row[idx] = fill.clone();
                }
            }
        }
    }

    /// Rows containing at least one null, as a copy.
    pub fn null_rows(&self) -> Table {
        self.filtered(|row| row.iter().any(Value::is_null))
    }

    /// Column subset restricted to columns containing at least one null.
    pub fn null_columns(&self) -> Table {
        let indices: Vec<usize> = (0..self.columns.len())
            .filter(|&i| self.rows.iter().any(|r| r[i].is_null()))
            .collect();
        Table {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| indices.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        }
    }

    /// Per-column null counts plus the grand total.
    pub fn null_counts(&self) -> (Vec<(String, usize)>, usize) {
        let per_column: Vec<(String, usize)> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let n = self.rows.iter().filter(|r| r[i].is_null()).count();
                (c.name.clone(), n)
            })
            .collect();
        let total = per_column.iter().map(|(_, n)| n).sum();
        (per_column, total)
    }

    /// Sum `val_col` grouped by `key_col`, keys in first-seen order.
    /// Null keys and null values are skipped.
    pub fn group_sum(&self, key_col: usize, val_col: usize) -> Vec<(String, f64)> {
        let mut groups: Vec<(String, f64)> = Vec::new();
        for row in &self.rows {
            if row[key_col].is_null() {
                continue;
            }
            let Some(v) = row[val_col].as_f64() else {
                continue;
            };
            let key = row[key_col].to_string();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, sum)) => *sum += v,
                None => groups.push((key, v)),
            }
        }
        groups
    }

    /// Export as a CSV artifact, overwriting any previous run's file.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("failed to create export {}", path.display()))?;
        writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to write export {}", path.display()))?;
        Ok(())
    }
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnType {
    let non_null = || cells.clone().map(str::trim).filter(|c| !c.is_empty());

    if non_null().all(|c| c.parse::<i64>().is_ok()) {
        ColumnType::Int
    } else if non_null().all(|c| c.parse::<f64>().is_ok()) {
        ColumnType::Real
    } else if non_null().all(|c| NaiveDate::parse_from_str(c, DATE_FORMAT).is_ok()) {
        ColumnType::Date
    } else {
        ColumnType::Text
    }
}

fn parse_cell(raw: &str, ty: ColumnType) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match ty {
        ColumnType::Int => trimmed
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or(Value::Null),
        ColumnType::Real => trimmed
            .parse::<f64>()
            .map(Value::Real)
            .unwrap_or(Value::Null),
        ColumnType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Value::Date)
            .unwrap_or(Value::Null),
        // Normalization: trim + lowercase, once, at load.
        ColumnType::Text => Value::Text(trimmed.to_lowercase()),
    }
}
