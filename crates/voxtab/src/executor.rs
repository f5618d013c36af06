//! Operation executor.
//!
//! One transformation per intent. The executor mutates the session
//! table for destructive cleaning operations and RETURNS everything
//! else as data: feedback events, export requests, chart specs. It
//! performs no I/O itself; the effect adapter does.

use tracing::info;

use crate::chart::{ChartKind, ChartSpec};
use crate::error::VoxError;
use crate::intent::{CleanOp, Intent};
use crate::session::Session;
use crate::table::{Column, ColumnType, Table, Value};

/// Tagged outcome of one operation step, consumed by the feedback sink.
#[derive(Debug, Clone, PartialEq)]
pub enum OpResult {
    Success(String),
    Warning(String),
    Failure(String),
}

impl OpResult {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Warning(m) | Self::Failure(m) => m,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Success(_) => Severity::Success,
            Self::Warning(_) => Severity::Warning,
            Self::Failure(_) => Severity::Failure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Success,
    Warning,
    Failure,
}

/// Export artifacts carry a fixed filename per operation kind and are
/// overwritten on each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Filtered,
    NullRows,
    NullColumns,
    NullSummary,
}

impl ExportKind {
    pub fn filename(&self) -> &'static str {
        match self {
            Self::Filtered => "filtered_output.csv",
            Self::NullRows => "null_rows.csv",
            Self::NullColumns => "null_columns.csv",
            Self::NullSummary => "null_summary.csv",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Export {
    pub kind: ExportKind,
    pub table: Table,
}

/// Everything one utterance produced. Each event is reported
/// separately; the overall status is the worst severity present.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub events: Vec<OpResult>,
    pub exports: Vec<Export>,
    pub chart: Option<ChartSpec>,
}

impl Outcome {
    fn single(event: OpResult) -> Self {
        Self {
            events: vec![event],
            ..Default::default()
        }
    }

    pub fn worst_severity(&self) -> Severity {
        self.events
            .iter()
            .map(OpResult::severity)
            .max()
            .unwrap_or(Severity::Success)
    }
}

fn missing_column(name: &str) -> OpResult {
    OpResult::Failure(format!("{}.", VoxError::ColumnNotFound(name.to_string())))
}

/// Execute a classified intent against the session.
pub fn execute(intent: &Intent, session: &mut Session) -> Outcome {
    info!("executing intent: {}", intent);

    match intent {
        Intent::OpenExcel => Outcome::single(OpResult::Success("Excel opened.".into())),
        Intent::Clean(ops) => execute_clean(ops, session),
        Intent::Filter {
            year,
            name,
            price_floor,
        } => execute_filter(*year, name.as_deref(), *price_floor, session),
        Intent::ShowNulls => execute_show_nulls(session),
        Intent::CountNulls => execute_count_nulls(session),
        Intent::Compare { names } => execute_compare(names, session),
        Intent::PlotCategorySales => execute_plot(
            session,
            "Category",
            "Sales",
            ChartKind::Bar,
            "Category-wise Sales",
            "Here is the sales chart.",
        ),
        Intent::PlotYearRevenue => execute_plot(
            session,
            "Year",
            "Revenue",
            ChartKind::Line,
            "Yearly Revenue Trend",
            "Here is the revenue trend.",
        ),
        Intent::UnknownChart => Outcome::single(OpResult::Failure(
            "Sorry, I couldn't understand the chart request.".into(),
        )),
        Intent::Unknown => Outcome::single(OpResult::Failure(format!("{}.", VoxError::NoMatch))),
    }
}

fn execute_clean(ops: &[CleanOp], session: &mut Session) -> Outcome {
    if ops.is_empty() {
        return Outcome::single(OpResult::Failure(
            "I didn't understand the data cleaning command.".into(),
        ));
    }

    let mut outcome = Outcome::default();
    for op in ops {
        let event = match op {
            CleanOp::FillMissingMean => {
                session.table_mut().fill_missing_mean();
                OpResult::Success("Filled missing values with the mean.".into())
            }
            CleanOp::RemoveDuplicates => {
                session.table_mut().drop_duplicates();
                OpResult::Success("Removed duplicate rows.".into())
            }
            CleanOp::TrimWhitespace => {
                session.table_mut().trim_whitespace();
                OpResult::Success("Trimmed whitespace in text fields.".into())
            }
            CleanOp::RemoveSalesNull => match session.table().column_index("sales") {
                Some(idx) => {
                    session.table_mut().retain_rows(|row| !row[idx].is_null());
                    OpResult::Success("Removed rows with null sales values.".into())
                }
                None => missing_column("Sales"),
            },
            CleanOp::RemoveInvalidPrice => match session.table().column_index("price") {
                Some(idx) => {
                    // Null prices fail the comparison and drop too.
                    session
                        .table_mut()
                        .retain_rows(|row| row[idx].as_f64().is_some_and(|p| p >= 0.0));
                    OpResult::Success("Removed rows with invalid price values.".into())
                }
                None => missing_column("Price"),
            },
        };
        outcome.events.push(event);
    }
    outcome
}

fn execute_filter(
    year: Option<i32>,
    name: Option<&str>,
    price_floor: Option<i64>,
    session: &mut Session,
) -> Outcome {
    let mut outcome = Outcome::default();
    // Filters operate on a copy; the stored table is never mutated.
    let mut working = session.table().clone();
    let mut applied: Vec<String> = Vec::new();

    if let Some(year) = year {
        match working.column_index("year") {
            Some(idx) => {
                working = working.filtered(|row| match &row[idx] {
                    Value::Int(y) => *y == i64::from(year),
                    other => other.as_f64().is_some_and(|y| y == f64::from(year)),
                });
                applied.push(format!("Year: {}", year));
            }
            None => outcome.events.push(missing_column("Year")),
        }
    }

    if let Some(name) = name {
        // The name appears in the applied-filters message but never
        // narrows rows; only the year and price predicates restrict.
        match working.column_index("name") {
            Some(_) => applied.push(format!("Name: {}", name)),
            None => outcome.events.push(missing_column("Name")),
        }
    }

    if let Some(floor) = price_floor {
        match working.column_index("price") {
            Some(idx) => {
                working = working.filtered(|row| row[idx].as_f64().is_some_and(|p| p >= floor as f64));
                applied.push(format!("Price >= {}", floor));
            }
            None => outcome.events.push(missing_column("Price")),
        }
    }

    if working.is_empty() {
        outcome
            .events
            .push(OpResult::Warning(format!("{}.", VoxError::EmptyResult)));
        return outcome;
    }

    let message = if applied.is_empty() {
        "No filters applied. Exported the full dataset.".to_string()
    } else {
        format!("Data filtered by {}. Exported.", applied.join(", "))
    };
    outcome.events.push(OpResult::Success(message));
    outcome.exports.push(Export {
        kind: ExportKind::Filtered,
        table: working,
    });
    outcome
}

fn execute_show_nulls(session: &mut Session) -> Outcome {
    let mut outcome = Outcome::default();

    let null_rows = session.table().null_rows();
    if !null_rows.is_empty() {
        outcome
            .events
            .push(OpResult::Success("Exported rows with null values.".into()));
        outcome.exports.push(Export {
            kind: ExportKind::NullRows,
            table: null_rows,
        });
    } else {
        outcome
            .events
            .push(OpResult::Success("No rows with null values found.".into()));
    }

    let null_columns = session.table().null_columns();
    if !null_columns.columns().is_empty() {
        outcome.events.push(OpResult::Success(
            "Exported columns with null values.".into(),
        ));
        outcome.exports.push(Export {
            kind: ExportKind::NullColumns,
            table: null_columns,
        });
    } else {
        outcome.events.push(OpResult::Success(
            "No columns with null values found.".into(),
        ));
    }

    outcome
}

fn execute_count_nulls(session: &mut Session) -> Outcome {
    let (per_column, total) = session.table().null_counts();

    let mut summary = Table::new(vec![
        Column {
            name: "column".into(),
            ty: ColumnType::Text,
        },
        Column {
            name: "null_count".into(),
            ty: ColumnType::Int,
        },
    ]);
    for (name, count) in per_column {
        summary.push_row(vec![Value::Text(name), Value::Int(count as i64)]);
    }

    Outcome {
        events: vec![OpResult::Success(format!(
            "There are {} missing values. Exported summary.",
            total
        ))],
        exports: vec![Export {
            kind: ExportKind::NullSummary,
            table: summary,
        }],
        chart: None,
    }
}

fn execute_compare(names: &[String], session: &mut Session) -> Outcome {
    let table = session.table();
    let Some(name_idx) = table.column_index("name") else {
        return Outcome::single(missing_column("Name"));
    };
    let Some(revenue_idx) = table.column_index("revenue") else {
        return Outcome::single(missing_column("Revenue"));
    };
    if names.len() < 2 {
        return Outcome::single(OpResult::Failure(
            "Please mention at least two valid names to compare.".into(),
        ));
    }

    let subset = table.filtered(|row| match &row[name_idx] {
        Value::Text(s) => names.iter().any(|n| n == s),
        _ => false,
    });
    let groups = subset.group_sum(name_idx, revenue_idx);

    Outcome {
        events: vec![OpResult::Success("Here is the comparison chart.".into())],
        exports: Vec::new(),
        chart: Some(ChartSpec::from_groups(
            ChartKind::Bar,
            "Revenue Comparison",
            "Name",
            "Revenue",
            groups,
        )),
    }
}

fn execute_plot(
    session: &mut Session,
    key_col: &str,
    val_col: &str,
    kind: ChartKind,
    title: &str,
    message: &str,
) -> Outcome {
    let table = session.table();
    let (Some(key_idx), Some(val_idx)) = (table.column_index(key_col), table.column_index(val_col))
    else {
        return Outcome::single(OpResult::Failure(format!(
            "{} or {} column not found.",
            key_col, val_col
        )));
    };

    let groups = table.group_sum(key_idx, val_idx);
    Outcome {
        events: vec![OpResult::Success(message.into())],
        exports: Vec::new(),
        chart: Some(ChartSpec::from_groups(kind, title, key_col, val_col, groups)),
    }
}
