//! Error taxonomy for the interpreter.
//!
//! Every error is converted into a spoken/displayed message at the
//! dispatch boundary; nothing propagates past a single utterance.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoxError {
    /// A required column is absent for the requested operation.
    #[error("{0} column not found")]
    ColumnNotFound(String),

    /// The utterance matched no known intent.
    #[error("I didn't understand the request")]
    NoMatch,

    /// A filter produced zero rows. Reported as a warning, not a failure.
    #[error("No matching data found")]
    EmptyResult,
}

/// Errors from the voice-capture collaborator.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no speech detected")]
    NoSpeech,

    #[error("could not understand the audio")]
    Unintelligible,

    #[error("capture device unavailable")]
    DeviceUnavailable,

    /// Input stream ended (console capture reached end of input).
    #[error("input closed")]
    Closed,
}
