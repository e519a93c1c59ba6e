//! User interface module - console reporting and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - The console [`Reporter`] used by the binary

use crate::report::{Level, Reporter};

pub mod formatter;

pub use formatter::{format_line, indent_block};

/// Prints report lines to the terminal.
///
/// Errors and warnings go to stderr, everything else to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        ConsoleReporter
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, level: Level, message: &str) {
        let line = formatter::format_line(level, message);
        match level {
            Level::Error | Level::Warning => eprintln!("{}", line),
            Level::Success | Level::Info | Level::Preview => println!("{}", line),
        }
    }
}
