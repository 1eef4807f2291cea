//! Seed command implementation.

use crate::cli::SeedArgs;
use crate::commands::admin_client;
use crate::error::Result;
use crate::output::Formatter;
use inkwell_domain::traits::ContentCatalog;
use inkwell_domain::{Clock, ContentItem, Slug, SystemClock};
use inkwell_sdk::{NewPost, RegisteredPost};
use inkwell_store::{SqliteStore, StoreError};

/// Execute the seed command.
pub async fn execute_seed(args: SeedArgs, url: &str, formatter: &Formatter) -> Result<()> {
    let slug = Slug::parse(&args.slug)?;
    let title = args.title.clone().unwrap_or_else(|| args.slug.clone());

    let registered = match &args.db {
        Some(path) => {
            let mut store = SqliteStore::new(path)?;
            let item = ContentItem::new(slug, title, SystemClock.now())
                .with_views(args.views)
                .with_published(!args.draft);
            seed_local(&mut store, item)?
        }
        None => {
            let client = admin_client(url, &args.admin).await?;
            client
                .register_post(&NewPost {
                    slug: slug.to_string(),
                    title,
                    published: !args.draft,
                    views: args.views,
                })
                .await?
        }
    };

    println!("{}", formatter.format_post(&registered)?);
    Ok(())
}

/// Register a post directly in a catalog
pub fn seed_local<S>(store: &mut S, item: ContentItem) -> Result<RegisteredPost>
where
    S: ContentCatalog<Error = StoreError>,
{
    let stored = store.upsert_item(item)?;
    tracing::info!(slug = %stored.slug, views = stored.views, "Seeded post");

    Ok(RegisteredPost {
        slug: stored.slug.to_string(),
        views: stored.views,
        published: stored.published,
    })
}
