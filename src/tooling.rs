//! Tooling & Integration Layer
//!
//! The command-line surface: argument parsing, command dispatch, and console
//! rendering.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, CommandOutput, Commands};
