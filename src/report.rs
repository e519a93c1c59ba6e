//! Status reporting for pipeline steps.
//!
//! The pipeline emits one line per step outcome through a [`Reporter`]. The
//! console implementation lives in [`crate::ui`]; [`RecordingReporter`]
//! keeps the lines in memory.

/// Severity of a reported line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
    /// What a dry run would have done
    Preview,
}

/// Sink for step outcomes
pub trait Reporter {
    fn report(&mut self, level: Level, message: &str);

    fn success(&mut self, message: &str) {
        self.report(Level::Success, message);
    }

    fn info(&mut self, message: &str) {
        self.report(Level::Info, message);
    }

    fn warning(&mut self, message: &str) {
        self.report(Level::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.report(Level::Error, message);
    }

    fn preview(&mut self, message: &str) {
        self.report(Level::Preview, message);
    }
}

/// Reporter that stores every line, in order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingReporter {
    pub lines: Vec<(Level, String)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages reported at the given level
    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, level: Level, message: &str) {
        self.lines.push((level, message.to_string()));
    }
}
