//! Collaborator boundaries: voice capture and feedback.
//!
//! The microphone, speech synthesis, and windowed status display are
//! external collaborators. These traits are the contract; the console
//! implementations here are what the CLI wires in.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::error::CaptureError;

/// Blocking source of utterances.
pub trait Capture {
    fn capture_utterance(&mut self) -> Result<String, CaptureError>;
}

/// Receives result messages and status updates. Speak failures are
/// swallowed and logged, never surfaced to the interpreter loop.
pub trait FeedbackSink {
    fn speak(&mut self, message: &str);
    fn set_status(&mut self, status: &str);
}

/// Reads one utterance per line from standard input.
pub struct ConsoleCapture<R> {
    reader: R,
}

impl ConsoleCapture<std::io::BufReader<std::io::Stdin>> {
    pub fn stdin() -> Self {
        Self {
            reader: std::io::BufReader::new(std::io::stdin()),
        }
    }
}

impl<R: BufRead> ConsoleCapture<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Capture for ConsoleCapture<R> {
    fn capture_utterance(&mut self) -> Result<String, CaptureError> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|_| CaptureError::DeviceUnavailable)?;
        if n == 0 {
            return Err(CaptureError::Closed);
        }
        let line = line.trim();
        if line.is_empty() {
            return Err(CaptureError::NoSpeech);
        }
        Ok(line.to_string())
    }
}

/// Prints spoken messages and status updates to the terminal.
pub struct ConsoleSink;

impl FeedbackSink for ConsoleSink {
    fn speak(&mut self, message: &str) {
        let mut out = std::io::stdout();
        if writeln!(out, "{}", message).is_err() {
            warn!("feedback output failed; message dropped");
        }
    }

    fn set_status(&mut self, status: &str) {
        let mut out = std::io::stdout();
        if writeln!(out, "[{}]", status).is_err() {
            warn!("status output failed");
        }
    }
}

/// Test double that records everything it was told.
#[derive(Default)]
pub struct RecordingSink {
    pub spoken: Vec<String>,
    pub statuses: Vec<String>,
}

impl FeedbackSink for RecordingSink {
    fn speak(&mut self, message: &str) {
        self.spoken.push(message.to_string());
    }

    fn set_status(&mut self, status: &str) {
        self.statuses.push(status.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_capture_trims_and_detects_silence() {
        let input = b"  show year 2020  \n\nrest\n";
        let mut capture = ConsoleCapture::new(&input[..]);
        assert_eq!(capture.capture_utterance().unwrap(), "show year 2020");
        assert!(matches!(
            capture.capture_utterance(),
            Err(CaptureError::NoSpeech)
        ));
        assert_eq!(capture.capture_utterance().unwrap(), "rest");
        assert!(matches!(
            capture.capture_utterance(),
            Err(CaptureError::Closed)
        ));
    }
}
