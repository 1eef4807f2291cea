//! Inkwell CLI library.
//!
//! Operator commands for the view-tracking server: seeding posts, reading
//! counters and statistics, running retention sweeps, and simulating an
//! engaged visit through the SDK's engagement gate.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
