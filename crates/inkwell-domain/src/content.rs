//! Content items as seen by the view-tracking core

use crate::Slug;

/// A published article
///
/// Owned by the authoring side; the core reads `slug` and `published` and only
/// ever mutates `views`, which never decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Stable identifier
    pub slug: Slug,

    /// Display title (statistics only)
    pub title: String,

    /// Only published items can be counted or read
    pub published: bool,

    /// Authoritative view counter
    pub views: u64,

    /// Creation time (unix seconds)
    pub created_at: u64,
}

impl ContentItem {
    /// Create a published item with zero views
    pub fn new(slug: Slug, title: impl Into<String>, created_at: u64) -> Self {
        Self {
            slug,
            title: title.into(),
            published: true,
            views: 0,
            created_at,
        }
    }

    /// Set the publication flag
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Set an initial view count (seeding / migration)
    pub fn with_views(mut self, views: u64) -> Self {
        self.views = views;
        self
    }
}
