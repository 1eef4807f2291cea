//! HTTP request handlers for the view-tracking service.
//!
//! Implements the public view endpoints and the admin surface using axum.

use crate::admin::{AdminAuth, AdminToken};
use crate::error::AppError;
use crate::fingerprint::{fingerprint, user_agent};
use crate::tracker::{CountOutcome, ViewTracker};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use inkwell_domain::{ContentItem, Slug};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// View counting over the shared store
    pub tracker: Arc<ViewTracker>,
    /// Admin token issuance and checks
    pub admin: Arc<AdminAuth>,
}

/// Query string of the eligibility endpoint
#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    /// Content slug
    pub slug: Option<String>,
}

/// Eligibility response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    /// Whether a view would be counted now
    pub can_view: bool,
    /// Human readable explanation
    pub message: String,
}

/// Response of the combined count endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    /// True when this request incremented the counter
    pub success: bool,
    /// Present and true when the visitor was already counted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub already_viewed: Option<bool>,
    /// Counter after the request
    pub views: u64,
}

/// Current counter
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewsResponse {
    /// Counter value
    pub views: u64,
}

/// Client-facing counting policy
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResponse {
    /// Seconds a reader must stay before a view is requested
    pub dwell_seconds: u64,
    /// Seconds during which a visitor counts once per item
    pub dedup_window_secs: u64,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Store status
    pub store: String,
}

/// One ledger entry in the visitor report
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentView {
    /// Content slug
    pub post_slug: String,
    /// Observation time (unix seconds)
    pub observed_at: u64,
    /// Whole hours since the observation
    pub hours_ago: u64,
}

/// What the service knows about the calling visitor
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorResponse {
    /// Leading characters of the fingerprint
    pub fingerprint: String,
    /// Truncated user-agent
    pub user_agent: String,
    /// Eligibility for the requested slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_view: Option<bool>,
    /// Number of entries in `recent_views`
    pub recent_views_count: usize,
    /// Ledger entries inside the dedup window
    pub recent_views: Vec<RecentView>,
}

/// Admin login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin password
    pub password: String,
}

/// Content item registration request
#[derive(Debug, Deserialize)]
pub struct RegisterPostRequest {
    /// Content slug
    pub slug: String,
    /// Display title
    pub title: String,
    /// Publication flag
    #[serde(default = "default_published")]
    pub published: bool,
    /// Starting counter; never lowers an existing one
    #[serde(default)]
    pub views: u64,
}

fn default_published() -> bool {
    true
}

/// Registered content item
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredPost {
    /// Content slug
    pub slug: String,
    /// Stored counter
    pub views: u64,
    /// Publication flag
    pub published: bool,
}

/// Top post entry
#[derive(Debug, Serialize, Deserialize)]
pub struct TopPost {
    /// Display title
    pub title: String,
    /// Content slug
    pub slug: String,
    /// Counter value
    pub views: u64,
}

/// Per-slug ledger activity entry
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostActivity {
    /// Content slug
    pub post_slug: String,
    /// Ledger records
    pub view_count: u64,
    /// Distinct visitors
    #[serde(rename = "uniqueIPCount")]
    pub unique_ip_count: u64,
}

/// Statistics block of the admin report
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBody {
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

/// Admin statistics response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Always true on success
    pub success: bool,
    /// Report body
    pub stats: StatsBody,
}

/// Sweep result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResponse {
    /// Records deleted, or that would be in dry-run mode
    pub pruned: usize,
    /// Records older than this were eligible
    pub cutoff: u64,
    /// Whether the ledger was left untouched
    pub dry_run: bool,
}

fn parse_slug(raw: &str) -> Result<Slug, AppError> {
    Ok(Slug::parse(raw)?)
}

/// GET /views/eligibility?slug= - Would a view be counted now
async fn eligibility(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SlugQuery>,
) -> Result<Json<EligibilityResponse>, AppError> {
    let raw = query
        .slug
        .ok_or_else(|| AppError::BadRequest("Missing slug parameter".to_string()))?;
    let slug = parse_slug(&raw)?;

    let fp = fingerprint(&headers, state.tracker.salt());
    let can_view = state.tracker.can_view(slug, fp).await?;

    let message = if can_view {
        "Visitor can view this post"
    } else {
        "Visitor has already viewed this post in the last 24 hours"
    };

    Ok(Json(EligibilityResponse {
        can_view,
        message: message.to_string(),
    }))
}

/// POST /views/:slug - Check, log and count in one step
async fn count_view(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CountResponse>, AppError> {
    // An unparseable slug cannot name a published item
    let slug = Slug::parse(&raw).map_err(|_| AppError::NotFound)?;
    let fp = fingerprint(&headers, state.tracker.salt());

    let response = match state.tracker.count_view(slug, fp, user_agent(&headers)).await? {
        CountOutcome::Counted { views } => CountResponse {
            success: true,
            already_viewed: None,
            views,
        },
        CountOutcome::AlreadyViewed { views } => CountResponse {
            success: false,
            already_viewed: Some(true),
            views,
        },
    };

    Ok(Json(response))
}

/// GET /views/:slug - Current counter
async fn get_views(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<ViewsResponse>, AppError> {
    let slug = Slug::parse(&raw).map_err(|_| AppError::NotFound)?;
    let views = state.tracker.get_count(slug).await?;
    Ok(Json(ViewsResponse { views }))
}

/// GET /views/policy - Dwell threshold and dedup window
async fn policy(State(state): State<AppState>) -> Json<PolicyResponse> {
    Json(PolicyResponse {
        dwell_seconds: state.tracker.dwell_secs(),
        dedup_window_secs: state.tracker.windows().dedup_secs(),
    })
}

/// GET /views/visitor - Ledger diagnostics for the caller
async fn visitor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SlugQuery>,
) -> Result<Json<VisitorResponse>, AppError> {
    let slug = query.slug.as_deref().map(parse_slug).transpose()?;
    let fp = fingerprint(&headers, state.tracker.salt());
    let short = fp.short().to_string();

    let report = state.tracker.visitor(fp, slug).await?;
    let now = state.tracker.now();

    let recent_views: Vec<RecentView> = report
        .recent
        .into_iter()
        .map(|event| RecentView {
            post_slug: event.slug.to_string(),
            observed_at: event.observed_at,
            hours_ago: now.saturating_sub(event.observed_at) / 3600,
        })
        .collect();

    Ok(Json(VisitorResponse {
        fingerprint: short,
        user_agent: user_agent(&headers).chars().take(50).collect(),
        can_view: report.can_view,
        recent_views_count: recent_views.len(),
        recent_views,
    }))
}

/// GET /health - Store reachability
async fn health_check(State(state): State<AppState>) -> Response {
    match state.tracker.ping().await {
        Ok(()) => Json(HealthCheckResponse {
            status: "healthy".to_string(),
            store: "ok".to_string(),
        })
        .into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthCheckResponse {
                    status: "unhealthy".to_string(),
                    store: "unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /admin/session - Exchange the admin password for a token
async fn admin_session(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AdminToken>, AppError> {
    let token = state.admin.login(&request.password).map_err(|e| {
        tracing::warn!("Rejected admin login: {}", e);
        AppError::from(e)
    })?;
    Ok(Json(token))
}

/// GET /admin/view-stats - Ledger and counter statistics
async fn view_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    state.admin.authorize(&headers)?;
    let stats = state.tracker.stats().await?;

    Ok(Json(StatsResponse {
        success: true,
        stats: StatsBody {
            total_view_logs: stats.total_view_logs,
            recent_view_logs: stats.recent_view_logs,
            total_post_views: stats.total_post_views,
            top_posts: stats
                .top_posts
                .into_iter()
                .map(|p| TopPost {
                    title: p.title,
                    slug: p.slug.to_string(),
                    views: p.views,
                })
                .collect(),
            views_by_post: stats
                .views_by_post
                .into_iter()
                .map(|a| PostActivity {
                    post_slug: a.slug.to_string(),
                    view_count: a.view_count,
                    unique_ip_count: a.unique_visitors,
                })
                .collect(),
        },
    }))
}

/// POST /admin/posts - Register or update a content item
async fn register_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterPostRequest>,
) -> Result<(StatusCode, Json<RegisteredPost>), AppError> {
    state.admin.authorize(&headers)?;
    let slug = parse_slug(&request.slug)?;

    let item = ContentItem::new(slug, request.title, state.tracker.now())
        .with_published(request.published)
        .with_views(request.views);
    let stored = state.tracker.register(item).await?;

    tracing::info!(slug = %stored.slug, views = stored.views, "Registered content item");
    Ok((
        StatusCode::CREATED,
        Json(RegisteredPost {
            slug: stored.slug.to_string(),
            views: stored.views,
            published: stored.published,
        }),
    ))
}

/// POST /admin/sweep - Run one retention sweep now
async fn sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SweepResponse>, AppError> {
    state.admin.authorize(&headers)?;
    let report = state.tracker.sweep().await?;

    Ok(Json(SweepResponse {
        pruned: report.pruned,
        cutoff: report.cutoff,
        dry_run: report.dry_run,
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/views/eligibility", get(eligibility))
        .route("/views/policy", get(policy))
        .route("/views/visitor", get(visitor))
        .route("/views/:slug", get(get_views).post(count_view))
        .route("/admin/session", post(admin_session))
        .route("/admin/view-stats", get(view_stats))
        .route("/admin/posts", post(register_post))
        .route("/admin/sweep", post(sweep))
        .route("/health", get(health_check))
        .with_state(state)
}
