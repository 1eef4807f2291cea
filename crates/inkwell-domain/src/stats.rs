//! Read models for the admin statistics surface

use crate::Slug;

/// View total for one content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostViews {
    /// Content slug
    pub slug: Slug,
    /// Display title
    pub title: String,
    /// Counter value
    pub views: u64,
}

/// Ledger activity for one slug over a period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugActivity {
    /// Content slug
    pub slug: Slug,
    /// Number of ledger records
    pub view_count: u64,
    /// Number of distinct fingerprints among those records
    pub unique_visitors: u64,
}
