//! Read-only commands: views, stats, health.

use crate::cli::{AdminArgs, ViewsArgs};
use crate::commands::admin_client;
use crate::error::Result;
use crate::output::Formatter;
use inkwell_domain::Slug;
use inkwell_sdk::ViewsClient;

/// Execute the views command.
pub async fn execute_views(args: ViewsArgs, url: &str, formatter: &Formatter) -> Result<()> {
    let slug = Slug::parse(&args.slug)?;
    let client = ViewsClient::new(url)?;
    let views = client.views(slug.as_str()).await?;
    println!("{}", formatter.format_views(slug.as_str(), views)?);
    Ok(())
}

/// Execute the stats command.
pub async fn execute_stats(args: AdminArgs, url: &str, formatter: &Formatter) -> Result<()> {
    let client = admin_client(url, &args).await?;
    let stats = client.view_stats().await?;
    println!("{}", formatter.format_stats(&stats)?);
    Ok(())
}

/// Execute the health command.
pub async fn execute_health(url: &str, formatter: &Formatter) -> Result<()> {
    let client = ViewsClient::new(url)?;
    let health = client.health().await?;
    println!("{}", formatter.format_health(&health)?);
    Ok(())
}
