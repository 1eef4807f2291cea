//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inkwell CLI - operate the view-tracking server.
#[derive(Debug, Parser)]
#[command(name = "inkwell")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Server URL
    #[arg(short, long, env = "INKWELL_URL", default_value = "http://localhost:8080", global = true)]
    pub url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register or update a post
    Seed(SeedArgs),

    /// Show the view counter of a post
    Views(ViewsArgs),

    /// Show ledger and counter statistics
    Stats(AdminArgs),

    /// Delete ledger records past the retention window
    Sweep(SweepArgs),

    /// Simulate an engaged visit
    Visit(VisitArgs),

    /// Check server health
    Health,
}

/// Admin credentials for server-side operations.
#[derive(Debug, Clone, clap::Args)]
pub struct AdminArgs {
    /// Admin password
    #[arg(long, env = "INKWELL_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the seed command.
#[derive(Debug, Parser)]
pub struct SeedArgs {
    /// Post slug
    pub slug: String,

    /// Post title (defaults to the slug)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Starting view counter
    #[arg(long, default_value = "0")]
    pub views: u64,

    /// Register as unpublished
    #[arg(long)]
    pub draft: bool,

    /// Write to a local database instead of the server
    #[arg(long, env = "INKWELL_DB")]
    pub db: Option<PathBuf>,

    #[command(flatten)]
    pub admin: AdminArgs,
}

/// Arguments for the views command.
#[derive(Debug, Parser)]
pub struct ViewsArgs {
    /// Post slug
    pub slug: String,
}

/// Arguments for the sweep command.
#[derive(Debug, Parser)]
pub struct SweepArgs {
    /// Sweep a local database instead of asking the server
    #[arg(long, env = "INKWELL_DB")]
    pub db: Option<PathBuf>,

    /// Retention in days (local sweeps only)
    #[arg(long, default_value = "30")]
    pub retention_days: u64,

    /// Count eligible records without deleting them (local sweeps only)
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub admin: AdminArgs,
}

/// Arguments for the visit command.
#[derive(Debug, Parser)]
pub struct VisitArgs {
    /// Post slug
    pub slug: String,

    /// Client address presented to the server
    #[arg(long = "as", value_name = "ADDRESS")]
    pub address: Option<String>,

    /// Dwell in seconds (defaults to the server policy)
    #[arg(long)]
    pub dwell: Option<u64>,
}
