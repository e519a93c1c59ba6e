pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod files;
pub mod git;
pub mod logging;
pub mod report;
pub mod ui;

pub use error::{ReleaseError, Result};
