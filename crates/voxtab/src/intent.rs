//! Deterministic intent classifier.
//!
//! Maps a normalized utterance to an intent via an ordered keyword rule
//! list. First match wins; the order is the contract. Overlapping
//! vocabulary ("year" in both filter and plot requests) is disambiguated
//! purely by rule order, not by scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Independent, non-exclusive data-hygiene operations. When several
/// match one utterance they all execute, in this declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanOp {
    FillMissingMean,
    RemoveDuplicates,
    TrimWhitespace,
    RemoveSalesNull,
    RemoveInvalidPrice,
}

/// Classified meaning of an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Acknowledge a request to open the spreadsheet program.
    OpenExcel,
    /// One or more cleaning sub-operations; empty means the cleaning
    /// family matched but no sub-operation did.
    Clean(Vec<CleanOp>),
    /// Filter the dataset; any parameter may be absent. With none
    /// present the full table is exported.
    Filter {
        year: Option<i32>,
        name: Option<String>,
        price_floor: Option<i64>,
    },
    /// Export the null-row and null-column subsets.
    ShowNulls,
    /// Export per-column null counts and report the grand total.
    CountNulls,
    /// Compare revenue across the named entities.
    Compare { names: Vec<String> },
    /// Bar chart: summed sales per category.
    PlotCategorySales,
    /// Line chart: summed revenue per year.
    PlotYearRevenue,
    /// "plot"/"chart" matched but neither column pair did.
    UnknownChart,
    Unknown,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OpenExcel => "open_excel",
            Self::Clean(_) => "clean",
            Self::Filter { .. } => "filter",
            Self::ShowNulls => "show_nulls",
            Self::CountNulls => "count_nulls",
            Self::Compare { .. } => "compare",
            Self::PlotCategorySales => "plot_category_sales",
            Self::PlotYearRevenue => "plot_year_revenue",
            Self::UnknownChart => "unknown_chart",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Keywords that route an utterance into the cleaning family.
const CLEANING_KEYWORDS: &[&str] = &[
    "clean data",
    "remove missing",
    "remove null",
    "fill missing",
    "fill null",
    "remove duplicates",
    "trim whitespace",
    "remove invalid",
    "remove sales null",
];

// Era-prefixed so a 5-6 digit price token cannot donate a 4-digit
// prefix as a bogus year.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4,6})\b").unwrap());

/// Classify an utterance against the known entity names (the distinct
/// values of the configured name column, lowercased at load).
///
/// The utterance is lowercased and trimmed here, exactly once; no
/// downstream operation re-normalizes.
pub fn classify(utterance: &str, known_names: &[String]) -> Intent {
    let u = utterance.trim().to_lowercase();

    // 1. Spreadsheet program request.
    if u.contains("open excel") {
        return Intent::OpenExcel;
    }

    // 2. Cleaning family; sub-operations are tested independently and
    //    may all match.
    if CLEANING_KEYWORDS.iter().any(|k| u.contains(k)) {
        return Intent::Clean(classify_cleaning(&u));
    }

    // 3. Filter. Fires on bare "show", so rule 4's "show null" phrasing
    //    never gets past this rule; the order is the contract.
    if u.contains("show") || u.contains("filter") {
        let year = extract_year(&u);
        let name = extract_entity_name(&u, known_names);
        let price_floor = extract_price_floor(&u, year);
        return Intent::Filter {
            year,
            name,
            price_floor,
        };
    }

    // 4. Null inspection.
    if ["show null", "check null", "null rows", "null columns"]
        .iter()
        .any(|k| u.contains(k))
    {
        return Intent::ShowNulls;
    }

    // 5. Null counting.
    if u.contains("count null") || u.contains("count nan") {
        return Intent::CountNulls;
    }

    // 6. Entity comparison: every whitespace token that exactly equals
    //    a known name, first-seen order, deduplicated.
    if u.contains("compare") {
        let mut names: Vec<String> = Vec::new();
        for word in u.split_whitespace() {
            if known_names.iter().any(|n| n == word) && !names.iter().any(|n| n == word) {
                names.push(word.to_string());
            }
        }
        return Intent::Compare { names };
    }

    // 7. Charts.
    if u.contains("plot") || u.contains("chart") {
        if u.contains("category") && u.contains("sales") {
            return Intent::PlotCategorySales;
        }
        if u.contains("year") && u.contains("revenue") {
            return Intent::PlotYearRevenue;
        }
        return Intent::UnknownChart;
    }

    Intent::Unknown
}

/// Independent tests, fixed execution order.
fn classify_cleaning(u: &str) -> Vec<CleanOp> {
    let mut ops = Vec::new();

    if (u.contains("fill") && (u.contains("missing") || u.contains("null")) && u.contains("mean"))
        || u.contains("fill missing")
        || u.contains("fill null")
    {
        ops.push(CleanOp::FillMissingMean);
    }
    if u.contains("remove duplicates") {
        ops.push(CleanOp::RemoveDuplicates);
    }
    if u.contains("trim whitespace") {
        ops.push(CleanOp::TrimWhitespace);
    }
    if u.contains("remove sales null") {
        ops.push(CleanOp::RemoveSalesNull);
    }
    if u.contains("remove invalid") {
        ops.push(CleanOp::RemoveInvalidPrice);
    }

    ops
}

fn extract_year(u: &str) -> Option<i32> {
    YEAR_RE
        .captures(u)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Longest known entity name contained in the utterance.
fn extract_entity_name(u: &str, known_names: &[String]) -> Option<String> {
    known_names
        .iter()
        .filter(|n| !n.is_empty() && u.contains(n.as_str()))
        .max_by_key(|n| n.len())
        .cloned()
}

/// First 4-6 digit token whose value differs from the extracted year.
fn extract_price_floor(u: &str, year: Option<i32>) -> Option<i64> {
    for m in NUMBER_RE.find_iter(u) {
        let Ok(n) = m.as_str().parse::<i64>() else {
            continue;
        };
        if year.map_or(true, |y| n != i64::from(y)) {
            return Some(n);
        }
    }
    None
}
