//! Wire types of the view-tracking HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `GET /views/eligibility`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EligibilityBody {
    pub can_view: bool,
}

/// Body of `POST /views/{slug}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CountBody {
    pub success: bool,
    #[serde(default)]
    pub already_viewed: bool,
    pub views: u64,
}

/// Body of `GET /views/{slug}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ViewsBody {
    pub views: u64,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Outcome of asking the server to count a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountResult {
    /// The view was counted
    Counted {
        /// Counter after the increment
        views: u64,
    },
    /// The visitor was already counted inside the dedup window
    AlreadyViewed {
        /// Counter, unchanged
        views: u64,
    },
}

impl CountResult {
    /// Counter value reported by the server
    pub fn views(&self) -> u64 {
        match self {
            CountResult::Counted { views } | CountResult::AlreadyViewed { views } => *views,
        }
    }
}

impl From<CountBody> for CountResult {
    fn from(body: CountBody) -> Self {
        if body.success && !body.already_viewed {
            CountResult::Counted { views: body.views }
        } else {
            CountResult::AlreadyViewed { views: body.views }
        }
    }
}

/// Counting policy published by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Seconds a reader must stay before a view is requested
    pub dwell_seconds: u64,
    /// Seconds during which a visitor counts once per item
    pub dedup_window_secs: u64,
}

/// Server health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Store status
    pub store: String,
}

/// Admin token issued by `POST /admin/session`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    /// Bearer token
    pub token: String,
    /// Expiry (unix seconds)
    pub expires_at: u64,
}

/// Content item registration
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    /// Content slug
    pub slug: String,
    /// Display title
    pub title: String,
    /// Publication flag
    pub published: bool,
    /// Starting counter
    pub views: u64,
}

/// Stored content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredPost {
    /// Content slug
    pub slug: String,
    /// Stored counter
    pub views: u64,
    /// Publication flag
    pub published: bool,
}

/// Top post entry of the statistics report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPost {
    /// Display title
    pub title: String,
    /// Content slug
    pub slug: String,
    /// Counter value
    pub views: u64,
}

/// Per-slug activity entry of the statistics report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostActivity {
    /// Content slug
    pub post_slug: String,
    /// Ledger records over the last 7 days
    pub view_count: u64,
    /// Distinct visitors over the last 7 days
    #[serde(rename = "uniqueIPCount")]
    pub unique_ip_count: u64,
}

/// Admin statistics report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStats {
    /// Ledger records stored
    pub total_view_logs: u64,
    /// Ledger records in the last 24 hours
    pub recent_view_logs: u64,
    /// Sum of published counters
    pub total_post_views: u64,
    /// Highest counters
    pub top_posts: Vec<TopPost>,
    /// Ledger activity over the last 7 days
    pub views_by_post: Vec<PostActivity>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatsEnvelope {
    pub stats: ViewStats,
}

/// Result of a retention sweep
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    /// Records deleted, or that would be in dry-run mode
    pub pruned: usize,
    /// Records older than this were eligible
    pub cutoff: u64,
    /// Whether the ledger was left untouched
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_body_parsing() {
        let counted: CountBody = serde_json::from_str(r#"{"success": true, "views": 12}"#).unwrap();
        assert_eq!(CountResult::from(counted), CountResult::Counted { views: 12 });

        let repeat: CountBody =
            serde_json::from_str(r#"{"success": false, "alreadyViewed": true, "views": 12}"#).unwrap();
        assert_eq!(CountResult::from(repeat), CountResult::AlreadyViewed { views: 12 });
    }

    #[test]
    fn test_stats_parsing() {
        let json = r#"{
            "success": true,
            "stats": {
                "totalViewLogs": 10,
                "recentViewLogs": 2,
                "totalPostViews": 340,
                "topPosts": [{"title": "Hello", "slug": "hello", "views": 300}],
                "viewsByPost": [{"postSlug": "hello", "viewCount": 7, "uniqueIPCount": 5}]
            }
        }"#;

        let envelope: StatsEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.stats.total_post_views, 340);
        assert_eq!(envelope.stats.top_posts[0].slug, "hello");
        assert_eq!(envelope.stats.views_by_post[0].unique_ip_count, 5);
    }
}
