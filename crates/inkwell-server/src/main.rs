//! Inkwell view server
//!
//! Starts the HTTP server for engagement-gated view counting.

use anyhow::Context;
use inkwell_server::{config::ServerConfig, start_server};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = match args.get(1).map(String::as_str) {
        Some("--config") => {
            let path = args.get(2).context("--config requires a path")?;
            ServerConfig::from_file(path)
                .with_context(|| format!("loading configuration from {}", path))?
        }
        Some("--help") | Some("-h") => {
            print_help();
            return Ok(());
        }
        Some(other) => anyhow::bail!("unknown argument: {} (see --help)", other),
        None => {
            eprintln!("Warning: No config file specified, using default test configuration");
            eprintln!("Usage: inkwell-server --config <path-to-config.toml>");
            eprintln!();
            ServerConfig::default_test_config()
        }
    };

    start_server(config).await.context("server stopped")?;
    Ok(())
}

fn print_help() {
    println!("Inkwell Server - Engagement-gated view counting");
    println!();
    println!("USAGE:");
    println!("    inkwell-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - salt: secret mixed into visitor fingerprints (required)");
    println!("    - admin_password: password for POST /admin/session (required)");
    println!("    - jwt_secret: key for signing admin tokens (required)");
    println!("    - bind_address / bind_port: listen address (default 127.0.0.1:8080)");
    println!("    - db_path: SQLite database file (default inkwell.db)");
    println!("    - dwell_seconds: engagement threshold (default 60)");
    println!("    - [janitor]: retention_days, sweep_interval_minutes, dry_run, enabled");
    println!();
    println!("Set RUST_LOG to adjust logging (default: info).");
}
