//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use inkwell_sdk::{GateState, Health, RegisteredPost, SweepResult, ViewStats};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    fn json<T: Serialize>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Format the statistics report.
    pub fn format_stats(&self, stats: &ViewStats) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Self::json(stats);
        }

        let mut out = String::new();
        out.push_str(&format!(
            "View logs: {} total, {} in the last 24h\nPost views: {}\n\n",
            stats.total_view_logs, stats.recent_view_logs, stats.total_post_views
        ));

        if stats.top_posts.is_empty() {
            out.push_str(&self.colorize("No posts with views.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Slug", "Title", "Views"]);
            for post in &stats.top_posts {
                builder.push_record([post.slug.clone(), post.title.clone(), post.views.to_string()]);
            }
            out.push_str(&Self::render(builder));
        }

        if !stats.views_by_post.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Slug", "Views (7d)", "Unique visitors"]);
            for activity in &stats.views_by_post {
                builder.push_record([
                    activity.post_slug.clone(),
                    activity.view_count.to_string(),
                    activity.unique_ip_count.to_string(),
                ]);
            }
            out.push_str("\n\n");
            out.push_str(&Self::render(builder));
        }

        Ok(out)
    }

    /// Format a registered post.
    pub fn format_post(&self, post: &RegisteredPost) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::json(post),
            OutputFormat::Table => {
                let state = if post.published { "published" } else { "draft" };
                Ok(self.success(&format!("Registered {} ({}, {} views)", post.slug, state, post.views)))
            }
        }
    }

    /// Format a counter value.
    pub fn format_views(&self, slug: &str, views: u64) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::json(&serde_json::json!({ "slug": slug, "views": views })),
            OutputFormat::Table => Ok(format!("{}: {} views", slug, views)),
        }
    }

    /// Format a sweep result.
    pub fn format_sweep(&self, result: &SweepResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::json(result),
            OutputFormat::Table if result.dry_run => Ok(self.info(&format!(
                "Dry run: {} record(s) older than {} would be deleted",
                result.pruned, result.cutoff
            ))),
            OutputFormat::Table => Ok(self.success(&format!(
                "Deleted {} record(s) older than {}",
                result.pruned, result.cutoff
            ))),
        }
    }

    /// Format server health.
    pub fn format_health(&self, health: &Health) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::json(health),
            OutputFormat::Table if health.status == "healthy" => {
                Ok(self.success(&format!("Server healthy (store: {})", health.store)))
            }
            OutputFormat::Table => Ok(self.error(&format!("Server unhealthy (store: {})", health.store))),
        }
    }

    /// Format the outcome of a simulated visit.
    pub fn format_visit(&self, slug: &str, state: &GateState) -> Result<String> {
        if self.format == OutputFormat::Json {
            let value = match state {
                GateState::Counted { views } => serde_json::json!({ "slug": slug, "outcome": "counted", "views": views }),
                GateState::Failed(reason) => serde_json::json!({ "slug": slug, "outcome": "failed", "error": reason }),
                other => serde_json::json!({ "slug": slug, "outcome": outcome_name(other) }),
            };
            return Self::json(&value);
        }

        Ok(match state {
            GateState::Counted { views } => self.success(&format!("View counted for {} ({} views)", slug, views)),
            GateState::Ineligible => self.info(&format!("Already counted for {} in the last 24 hours", slug)),
            GateState::Abandoned => self.warning(&format!("Visit to {} abandoned before dwell", slug)),
            GateState::Failed(reason) => self.error(&format!("Visit to {} failed: {}", slug, reason)),
            other => self.info(&format!("Visit to {}: {}", slug, outcome_name(other))),
        })
    }

    fn render(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn outcome_name(state: &GateState) -> &'static str {
    match state {
        GateState::Unchecked => "unchecked",
        GateState::Eligible => "eligible",
        GateState::Ineligible => "ineligible",
        GateState::Counted { .. } => "counted",
        GateState::Abandoned => "abandoned",
        GateState::Failed(_) => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_sdk::{PostActivity, TopPost};

    fn sample_stats() -> ViewStats {
        ViewStats {
            total_view_logs: 12,
            recent_view_logs: 3,
            total_post_views: 150,
            top_posts: vec![TopPost {
                title: "Hello".to_string(),
                slug: "hello".to_string(),
                views: 150,
            }],
            views_by_post: vec![PostActivity {
                post_slug: "hello".to_string(),
                view_count: 12,
                unique_ip_count: 9,
            }],
        }
    }

    #[test]
    fn test_stats_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_stats(&sample_stats()).unwrap();
        assert!(output.contains("12 total, 3 in the last 24h"));
        assert!(output.contains("Unique visitors"));
        assert!(output.contains("hello"));
    }

    #[test]
    fn test_stats_json_keeps_wire_names() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_stats(&sample_stats()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["totalPostViews"], 150);
        assert_eq!(value["viewsByPost"][0]["uniqueIPCount"], 9);
    }

    #[test]
    fn test_empty_stats() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let stats = ViewStats {
            top_posts: vec![],
            views_by_post: vec![],
            ..sample_stats()
        };
        assert!(formatter.format_stats(&stats).unwrap().contains("No posts with views"));
    }

    #[test]
    fn test_dry_run_sweep() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let result = SweepResult {
            pruned: 4,
            cutoff: 100,
            dry_run: true,
        };
        assert_eq!(
            formatter.format_sweep(&result).unwrap(),
            "ℹ Dry run: 4 record(s) older than 100 would be deleted"
        );
    }

    #[test]
    fn test_visit_outcomes() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_visit("essay", &GateState::Counted { views: 3 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["outcome"], "counted");
        assert_eq!(value["views"], 3);

        let output = formatter.format_visit("essay", &GateState::Abandoned).unwrap();
        assert!(output.contains("abandoned"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
