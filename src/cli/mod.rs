//! Workflow entry points used by the binary

pub mod orchestration;

pub use orchestration::{run_release, ReleaseArgs, ReleaseOutcome};
