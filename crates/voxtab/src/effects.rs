//! Effect adapter: turns an executor `Outcome` into the outside world.
//!
//! Writes export artifacts and the chart spec, speaks each event, and
//! sets a status line from the worst severity. Export failures degrade
//! to a spoken message; nothing here is fatal (the loop must always
//! return to a ready state).

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::executor::{Outcome, Severity};
use crate::io::FeedbackSink;

const CHART_FILENAME: &str = "chart.json";

pub fn apply_outcome(outcome: &Outcome, output_dir: &Path, sink: &mut dyn FeedbackSink) {
    for export in &outcome.exports {
        let path = output_dir.join(export.kind.filename());
        match export.table.write_csv(&path) {
            Ok(()) => info!("wrote {} ({} rows)", path.display(), export.table.row_count()),
            Err(err) => {
                warn!("export failed: {:#}", err);
                sink.speak(&format!("Failed to export {}.", export.kind.filename()));
            }
        }
    }

    if let Some(chart) = &outcome.chart {
        let path = output_dir.join(CHART_FILENAME);
        match serde_json::to_string_pretty(chart) {
            Ok(json) => {
                if let Err(err) = fs::write(&path, json) {
                    warn!("chart spec write failed: {}", err);
                    sink.speak("Failed to write the chart.");
                } else {
                    info!("wrote chart spec {}", path.display());
                }
            }
            Err(err) => warn!("chart spec serialization failed: {}", err),
        }
    }

    for event in &outcome.events {
        sink.speak(event.message());
    }

    sink.set_status(match outcome.worst_severity() {
        Severity::Success => "done",
        Severity::Warning => "no matching data",
        Severity::Failure => "command failed",
    });
}
