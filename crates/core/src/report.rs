//! Host log and failure channels.

use std::sync::Mutex;

/// Sink for messages shown in the host run's log.
///
/// Implementations decide how each level is rendered; the pipeline only
/// chooses the level.
pub trait Reporter: Send + Sync {
    /// Normal progress.
    fn info(&self, message: &str);

    /// Something the user should look at, without failing the run.
    fn warning(&self, message: &str);

    /// Detail only shown when the host runs in debug mode.
    fn debug(&self, message: &str);

    /// Mark the run as failed with a single human-readable message.
    fn fail(&self, message: &str);
}

/// Severity of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// [`Reporter::info`].
    Info,
    /// [`Reporter::warning`].
    Warning,
    /// [`Reporter::debug`].
    Debug,
    /// [`Reporter::fail`].
    Failure,
}

/// In-memory reporter that keeps every message in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    /// Create an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far.
    #[must_use]
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`.
    #[must_use]
    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(recorded, _)| *recorded == level)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn fail(&self, message: &str) {
        self.push(Level::Failure, message);
    }
}
