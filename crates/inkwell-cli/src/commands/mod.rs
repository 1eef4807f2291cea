//! Command implementations.

pub mod report;
pub mod seed;
pub mod sweep;
pub mod visit;

pub use self::report::{execute_health, execute_stats, execute_views};
pub use self::seed::execute_seed;
pub use self::sweep::execute_sweep;
pub use self::visit::execute_visit;

use crate::cli::AdminArgs;
use crate::error::{CliError, Result};
use inkwell_sdk::ViewsClient;

/// Client logged in as admin
pub(crate) async fn admin_client(url: &str, args: &AdminArgs) -> Result<ViewsClient> {
    let password = args.password.as_deref().ok_or(CliError::MissingPassword)?;
    let mut client = ViewsClient::new(url)?;
    client.login(password).await?;
    Ok(client)
}
