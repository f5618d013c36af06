//! voxtab - voice-driven command interpreter for tabular datasets.
//!
//! Control flow: raw utterance -> normalize -> classify -> execute ->
//! feedback. Each utterance is handled independently; the only state
//! that persists between utterances is the session table.

pub mod chart;
pub mod config;
pub mod effects;
pub mod error;
pub mod executor;
pub mod intent;
pub mod io;
pub mod session;
pub mod table;

pub use chart::{ChartKind, ChartSpec};
pub use config::VoxConfig;
pub use error::{CaptureError, VoxError};
pub use executor::{Outcome, Severity};
pub use intent::Intent;
pub use session::Session;
pub use table::Table;

use tracing::debug;

/// Handle one utterance end to end, without side effects: classify it
/// against the session's entity names and execute the intent. The
/// caller applies the returned outcome through the effect adapter.
pub fn handle_utterance(utterance: &str, session: &mut Session) -> Outcome {
    let known_names = session.known_names();
    let intent = intent::classify(utterance, &known_names);
    debug!("utterance {:?} classified as {}", utterance, intent);
    executor::execute(&intent, session)
}
