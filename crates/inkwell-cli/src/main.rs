//! Inkwell CLI - operator tool for the view-tracking server.

use clap::Parser;
use inkwell_cli::commands;
use inkwell_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> inkwell_cli::Result<()> {
    let cli = Cli::parse();
    let formatter = Formatter::new(cli.format.into(), !cli.no_color);
    let url = cli.url.as_str();

    match cli.command {
        Command::Seed(args) => commands::execute_seed(args, url, &formatter).await?,
        Command::Views(args) => commands::execute_views(args, url, &formatter).await?,
        Command::Stats(args) => commands::execute_stats(args, url, &formatter).await?,
        Command::Sweep(args) => commands::execute_sweep(args, url, &formatter).await?,
        Command::Visit(args) => commands::execute_visit(args, url, &formatter).await?,
        Command::Health => commands::execute_health(url, &formatter).await?,
    }

    Ok(())
}
