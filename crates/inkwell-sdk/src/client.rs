//! Inkwell client implementation.

use crate::error::SdkError;
use crate::gate::ViewTransport;
use crate::types::{
    AdminSession, CountBody, CountResult, EligibilityBody, ErrorBody, Health, NewPost, Policy,
    RegisteredPost, StatsEnvelope, SweepResult, ViewStats, ViewsBody,
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the view-tracking API
#[derive(Clone)]
pub struct ViewsClient {
    base_url: String,
    http: reqwest::Client,
    forwarded_for: Option<String>,
    admin_token: Option<String>,
}

impl ViewsClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("inkwell-sdk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            forwarded_for: None,
            admin_token: None,
        })
    }

    /// Present every public request as coming from `address`
    ///
    /// Sets `x-forwarded-for`, which the server trusts first. Useful behind a
    /// proxy that terminates the client connection, and for simulations.
    pub fn with_forwarded_for(mut self, address: &str) -> Self {
        self.forwarded_for = Some(address.to_string());
        self
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Slug as a single escaped path segment under /views
    fn slug_url(&self, slug: &str) -> Result<Url, SdkError> {
        let mut url = Url::parse(&self.url("/views")).map_err(|e| SdkError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SdkError::InvalidUrl(self.base_url.clone()))?
            .push(slug);
        Ok(url)
    }

    fn public(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.forwarded_for {
            Some(addr) => builder.header("x-forwarded-for", addr),
            None => builder,
        }
    }

    fn admin(&self, builder: RequestBuilder) -> Result<RequestBuilder, SdkError> {
        let token = self.admin_token.as_ref().ok_or(SdkError::NotLoggedIn)?;
        Ok(builder.bearer_auth(token))
    }

    /// Whether a view by this client would be counted now
    pub async fn eligibility(&self, slug: &str) -> Result<bool, SdkError> {
        let request = self
            .public(self.http.get(self.url("/views/eligibility")))
            .query(&[("slug", slug)]);

        let body: EligibilityBody = send(request).await?;
        Ok(body.can_view)
    }

    /// Ask the server to count a view
    pub async fn count_view(&self, slug: &str) -> Result<CountResult, SdkError> {
        let request = self.public(self.http.post(self.slug_url(slug)?));
        let body: CountBody = send(request).await?;
        Ok(body.into())
    }

    /// Current counter of a published item
    pub async fn views(&self, slug: &str) -> Result<u64, SdkError> {
        let request = self.public(self.http.get(self.slug_url(slug)?));
        let body: ViewsBody = send(request).await?;
        Ok(body.views)
    }

    /// Dwell threshold and dedup window configured on the server
    pub async fn policy(&self) -> Result<Policy, SdkError> {
        send(self.http.get(self.url("/views/policy"))).await
    }

    /// Server health
    pub async fn health(&self) -> Result<Health, SdkError> {
        send(self.http.get(self.url("/health"))).await
    }

    /// Exchange the admin password for a token used by admin calls
    pub async fn login(&mut self, password: &str) -> Result<AdminSession, SdkError> {
        let request = self
            .http
            .post(self.url("/admin/session"))
            .json(&serde_json::json!({ "password": password }));

        let session: AdminSession = send(request).await?;
        self.admin_token = Some(session.token.clone());
        Ok(session)
    }

    /// Whether `login` has succeeded
    pub fn is_logged_in(&self) -> bool {
        self.admin_token.is_some()
    }

    /// Register or update a content item
    pub async fn register_post(&self, post: &NewPost) -> Result<RegisteredPost, SdkError> {
        let request = self.admin(self.http.post(self.url("/admin/posts")))?.json(post);
        send(request).await
    }

    /// Ledger and counter statistics
    pub async fn view_stats(&self) -> Result<ViewStats, SdkError> {
        let request = self.admin(self.http.get(self.url("/admin/view-stats")))?;
        let envelope: StatsEnvelope = send(request).await?;
        Ok(envelope.stats)
    }

    /// Run a retention sweep on the server
    pub async fn sweep(&self) -> Result<SweepResult, SdkError> {
        let request = self.admin(self.http.post(self.url("/admin/sweep")))?;
        send(request).await
    }
}

#[async_trait]
impl ViewTransport for ViewsClient {
    async fn check_eligibility(&self, slug: &str) -> Result<bool, SdkError> {
        self.eligibility(slug).await
    }

    async fn record_view(&self, slug: &str) -> Result<CountResult, SdkError> {
        self.count_view(slug).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SdkError> {
    let response = request.send().await?;
    let response = check_status(response).await?;
    Ok(response.json().await?)
}

async fn check_status(response: Response) -> Result<Response, SdkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => match body.details {
            Some(details) => format!("{} ({})", body.error, details),
            None => body.error,
        },
        Err(_) if text.is_empty() => status.to_string(),
        Err(_) => text,
    };

    Err(match status {
        StatusCode::NOT_FOUND => SdkError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SdkError::AuthError(message),
        _ => SdkError::Http {
            status: status.as_u16(),
            message,
        },
    })
}
