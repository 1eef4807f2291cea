//! Visit command implementation.

use crate::cli::VisitArgs;
use crate::error::Result;
use crate::output::Formatter;
use inkwell_domain::Slug;
use inkwell_sdk::{EngagementGate, ViewsClient};
use std::time::Duration;

/// Execute the visit command.
///
/// Behaves like a reader: checks eligibility, waits out the dwell, then asks
/// for the view to be counted. Ctrl+C during the dwell abandons the visit.
pub async fn execute_visit(args: VisitArgs, url: &str, formatter: &Formatter) -> Result<()> {
    let slug = Slug::parse(&args.slug)?;
    let mut client = ViewsClient::new(url)?;
    if let Some(address) = &args.address {
        client = client.with_forwarded_for(address);
    }

    let dwell = match args.dwell {
        Some(secs) => Duration::from_secs(secs),
        None => Duration::from_secs(client.policy().await?.dwell_seconds),
    };

    let mut gate = EngagementGate::new(client, slug.to_string()).with_dwell(dwell);
    let cancel = gate.cancel_handle();

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    if !dwell.is_zero() {
        println!("{}", formatter.info(&format!("Reading {} for {}s...", slug, dwell.as_secs())));
    }

    let state = gate.run().await;
    interrupt.abort();

    println!("{}", formatter.format_visit(slug.as_str(), &state)?);
    Ok(())
}
