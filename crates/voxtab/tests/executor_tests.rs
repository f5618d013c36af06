//! End-to-end utterance scenarios: classify, execute, inspect the
//! outcome, and (where artifacts matter) run the effect adapter.

use approx::assert_relative_eq;
use voxtab::executor::{ExportKind, OpResult, Severity};
use voxtab::io::RecordingSink;
use voxtab::table::{Column, ColumnType, Table, Value};
use voxtab::{handle_utterance, Session};

fn column(name: &str, ty: ColumnType) -> Column {
    Column {
        name: name.to_string(),
        ty,
    }
}

/// Dataset with columns [Name, Year, Price, Sales, Revenue, Category].
fn sales_session() -> Session {
    let mut table = Table::new(vec![
        column("Name", ColumnType::Text),
        column("Year", ColumnType::Int),
        column("Price", ColumnType::Real),
        column("Sales", ColumnType::Real),
        column("Revenue", ColumnType::Real),
        column("Category", ColumnType::Text),
    ]);
    table.push_row(vec![
        Value::Text("acme".into()),
        Value::Int(2020),
        Value::Real(20000.0),
        Value::Real(120.0),
        Value::Real(5000.0),
        Value::Text("tools".into()),
    ]);
    table.push_row(vec![
        Value::Text("globex".into()),
        Value::Int(2021),
        Value::Real(9000.0),
        Value::Real(80.0),
        Value::Real(7000.0),
        Value::Text("toys".into()),
    ]);
    table.push_row(vec![
        Value::Text("acme".into()),
        Value::Int(2020),
        Value::Real(16000.0),
        Value::Null,
        Value::Real(2500.0),
        Value::Text("tools".into()),
    ]);
    Session::new(table, "name")
}

#[test]
fn parameterless_filter_exports_the_full_dataset() {
    let mut session = sales_session();
    let before = session.table().clone();

    let outcome = handle_utterance("show everything please", &mut session);

    assert_eq!(outcome.worst_severity(), Severity::Success);
    assert_eq!(outcome.exports.len(), 1);
    let export = &outcome.exports[0];
    assert_eq!(export.kind, ExportKind::Filtered);
    assert_eq!(export.table.rows(), before.rows());
    // The stored table was not mutated either.
    assert_eq!(session.table().rows(), before.rows());
}

#[test]
fn year_and_price_filter_excludes_non_matching_rows() {
    let mut session = sales_session();

    let outcome = handle_utterance("show year 2020 price 15000", &mut session);

    let export = &outcome.exports[0];
    assert_eq!(export.kind, ExportKind::Filtered);
    // Both acme 2020 rows have price >= 15000; globex 2021 is excluded.
    assert_eq!(export.table.row_count(), 2);
    let year = export.table.column_index("year").unwrap();
    let price = export.table.column_index("price").unwrap();
    for row in export.table.rows() {
        assert_eq!(row[year], Value::Int(2020));
        assert!(row[price].as_f64().unwrap() >= 15000.0);
    }
    assert!(matches!(
        outcome.events.last().unwrap(),
        OpResult::Success(msg) if msg.contains("Year: 2020") && msg.contains("Price >= 15000")
    ));
}

#[test]
fn name_filter_is_reported_but_never_narrows_rows() {
    let mut session = sales_session();

    let outcome = handle_utterance("show acme", &mut session);

    let export = &outcome.exports[0];
    assert_eq!(export.kind, ExportKind::Filtered);
    // The message claims a name filter, but every row survives,
    // globex included.
    assert_eq!(export.table.row_count(), session.table().row_count());
    let name = export.table.column_index("name").unwrap();
    assert!(export
        .table
        .rows()
        .iter()
        .any(|r| r[name] == Value::Text("globex".into())));
    assert!(matches!(
        outcome.events.last().unwrap(),
        OpResult::Success(msg) if msg.contains("Name: acme")
    ));
}

#[test]
fn empty_filter_result_is_a_warning_with_no_export() {
    let mut session = sales_session();
    let outcome = handle_utterance("filter year 1999", &mut session);
    assert_eq!(outcome.worst_severity(), Severity::Warning);
    assert!(outcome.exports.is_empty());
}

#[test]
fn remove_duplicates_leaves_no_identical_rows() {
    let mut table = Table::new(vec![column("Name", ColumnType::Text)]);
    for name in ["acme", "acme", "globex", "acme"] {
        table.push_row(vec![Value::Text(name.into())]);
    }
    let mut session = Session::new(table, "name");
    let before = session.table().row_count();

    handle_utterance("remove duplicates", &mut session);

    let after = session.table().row_count();
    assert!(after <= before);
    assert_eq!(after, 2);
    for (i, a) in session.table().rows().iter().enumerate() {
        for b in session.table().rows().iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn remove_sales_null_without_sales_column_fails_and_preserves_data() {
    let mut table = Table::new(vec![
        column("Name", ColumnType::Text),
        column("Year", ColumnType::Int),
    ]);
    table.push_row(vec![Value::Text("acme".into()), Value::Int(2020)]);
    let mut session = Session::new(table, "name");
    let before = session.table().clone();

    let outcome = handle_utterance("remove sales null", &mut session);

    assert_eq!(outcome.worst_severity(), Severity::Failure);
    assert!(matches!(
        &outcome.events[0],
        OpResult::Failure(msg) if msg.contains("Sales")
    ));
    assert_eq!(session.table().rows(), before.rows());
}

#[test]
fn invalid_price_then_sales_null_empties_the_table_but_keeps_columns() {
    let mut table = Table::new(vec![
        column("Name", ColumnType::Text),
        column("Year", ColumnType::Int),
        column("Price", ColumnType::Real),
        column("Sales", ColumnType::Real),
    ]);
    table.push_row(vec![
        Value::Text("acme".into()),
        Value::Int(2020),
        Value::Real(-5.0),
        Value::Null,
    ]);
    let mut session = Session::new(table, "name");

    let first = handle_utterance("remove invalid", &mut session);
    assert_eq!(first.worst_severity(), Severity::Success);
    assert_eq!(session.table().row_count(), 0);

    let second = handle_utterance("remove sales null", &mut session);
    assert_eq!(second.worst_severity(), Severity::Success);
    assert_eq!(session.table().row_count(), 0);

    let names: Vec<&str> = session
        .table()
        .columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Name", "Year", "Price", "Sales"]);
}

#[test]
fn combined_cleaning_utterance_runs_sub_operations_in_fixed_order() {
    let mut session = sales_session();
    let outcome = handle_utterance(
        "clean data fill missing and remove duplicates and trim whitespace",
        &mut session,
    );
    let messages: Vec<&str> = outcome.events.iter().map(|e| e.message()).collect();
    assert_eq!(
        messages,
        vec![
            "Filled missing values with the mean.",
            "Removed duplicate rows.",
            "Trimmed whitespace in text fields.",
        ]
    );
    // Numeric nulls were imputed before deduplication.
    let sales = session.table().column_index("sales").unwrap();
    assert!(session.table().rows().iter().all(|r| !r[sales].is_null()));
    // Mean of 120 and 80.
    assert_relative_eq!(
        session.table().rows()[2][sales].as_f64().unwrap(),
        100.0
    );
}

#[test]
fn unmatched_cleaning_family_is_a_failure_and_leaves_data_alone() {
    let mut session = sales_session();
    let before = session.table().clone();
    let outcome = handle_utterance("remove missing", &mut session);
    assert_eq!(outcome.worst_severity(), Severity::Failure);
    assert_eq!(session.table().rows(), before.rows());
}

#[test]
fn count_nulls_on_clean_data_reports_zero_and_still_exports() {
    let mut table = Table::new(vec![
        column("Name", ColumnType::Text),
        column("Year", ColumnType::Int),
    ]);
    table.push_row(vec![Value::Text("acme".into()), Value::Int(2020)]);
    let mut session = Session::new(table, "name");

    let outcome = handle_utterance("count null values", &mut session);

    assert!(matches!(
        &outcome.events[0],
        OpResult::Success(msg) if msg.contains("0 missing values")
    ));
    assert_eq!(outcome.exports.len(), 1);
    assert_eq!(outcome.exports[0].kind, ExportKind::NullSummary);

    // The artifact is really written.
    let dir = tempfile::tempdir().unwrap();
    let mut sink = RecordingSink::default();
    voxtab::effects::apply_outcome(&outcome, dir.path(), &mut sink);
    assert!(dir.path().join("null_summary.csv").exists());
}

#[test]
fn show_nulls_exports_row_and_column_subsets_separately() {
    let mut session = sales_session();
    let outcome = handle_utterance("check null values", &mut session);

    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.exports.len(), 2);
    assert_eq!(outcome.exports[0].kind, ExportKind::NullRows);
    assert_eq!(outcome.exports[1].kind, ExportKind::NullColumns);
    assert_eq!(outcome.exports[0].table.row_count(), 1);
    assert_eq!(outcome.exports[1].table.columns().len(), 1);
    assert_eq!(outcome.exports[1].table.columns()[0].name, "Sales");
}

#[test]
fn compare_produces_a_bar_chart_with_exactly_two_categories() {
    let mut session = sales_session();
    let outcome = handle_utterance("compare acme and globex", &mut session);

    let chart = outcome.chart.expect("comparison should build a chart");
    assert_eq!(chart.kind, voxtab::ChartKind::Bar);
    assert_eq!(chart.categories, vec!["acme", "globex"]);
    assert_relative_eq!(chart.values[0], 7500.0);
    assert_relative_eq!(chart.values[1], 7000.0);
    assert_eq!(chart.title, "Revenue Comparison");
}

#[test]
fn compare_with_one_recognized_name_fails() {
    let mut session = sales_session();
    let outcome = handle_utterance("compare acme and initech", &mut session);
    assert_eq!(outcome.worst_severity(), Severity::Failure);
    assert!(outcome.chart.is_none());
}

#[test]
fn category_sales_and_year_revenue_charts() {
    let mut session = sales_session();

    let bar = handle_utterance("plot category sales", &mut session);
    let bar_chart = bar.chart.expect("bar chart");
    assert_eq!(bar_chart.kind, voxtab::ChartKind::Bar);
    assert_eq!(bar_chart.categories, vec!["tools", "toys"]);
    assert_relative_eq!(bar_chart.values[0], 120.0);
    assert_relative_eq!(bar_chart.values[1], 80.0);

    let line = handle_utterance("chart year revenue trend", &mut session);
    let line_chart = line.chart.expect("line chart");
    assert_eq!(line_chart.kind, voxtab::ChartKind::Line);
    assert_eq!(line_chart.categories, vec!["2020", "2021"]);
    assert_relative_eq!(line_chart.values[0], 7500.0);
    assert_relative_eq!(line_chart.values[1], 7000.0);
}

#[test]
fn chart_request_without_known_columns_fails() {
    let mut table = Table::new(vec![column("Name", ColumnType::Text)]);
    table.push_row(vec![Value::Text("acme".into())]);
    let mut session = Session::new(table, "name");

    let outcome = handle_utterance("plot category sales", &mut session);
    assert_eq!(outcome.worst_severity(), Severity::Failure);
    assert!(matches!(
        &outcome.events[0],
        OpResult::Failure(msg) if msg.contains("Category") || msg.contains("Sales")
    ));
}

#[test]
fn unknown_utterance_is_a_generic_failure() {
    let mut session = sales_session();
    let outcome = handle_utterance("make me a sandwich", &mut session);
    assert_eq!(outcome.worst_severity(), Severity::Failure);
    assert!(outcome.exports.is_empty());
    assert!(outcome.chart.is_none());
}
