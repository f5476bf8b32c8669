//! Command-line interface for datasight.
//!
//! Provides commands for running the full analysis pipeline, one-off
//! quality assessment, and dataset acquisition.

mod commands;

pub use commands::{parse_cli, run, run_with_cli};
