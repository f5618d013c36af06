//! Chart specifications produced by aggregation operations.
//!
//! The interpreter only decides WHAT to draw; rendering belongs to the
//! presentation collaborator. The effect adapter serializes the spec as
//! JSON for whatever renders it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSpec {
    /// Build a spec from grouped (key, sum) pairs.
    pub fn from_groups(
        kind: ChartKind,
        title: &str,
        x_label: &str,
        y_label: &str,
        groups: Vec<(String, f64)>,
    ) -> Self {
        let (categories, values) = groups.into_iter().unzip();
        Self {
            kind,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            categories,
            values,
        }
    }
}
