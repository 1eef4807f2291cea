//! Visitor identification from request headers

use axum::http::HeaderMap;
use inkwell_domain::fingerprint::FALLBACK_ADDRESS;
use inkwell_domain::Fingerprint;

/// Headers consulted for the client address, highest priority first
pub const ADDRESS_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Longest user-agent stored with a view record
const MAX_USER_AGENT_LEN: usize = 512;

/// Resolve the client address from proxy headers
///
/// `x-forwarded-for` may carry a chain; only its first entry is used. Headers
/// that are absent, empty or not valid UTF-8 are skipped. Without any usable
/// header the loopback address is returned, so direct clients share one
/// identity.
pub fn client_address(headers: &HeaderMap) -> String {
    ADDRESS_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(FALLBACK_ADDRESS)
        .to_string()
}

/// Fingerprint the client behind `headers`
pub fn fingerprint(headers: &HeaderMap, salt: &str) -> Fingerprint {
    Fingerprint::derive(&client_address(headers), salt)
}

/// User-agent header, truncated for storage
pub fn user_agent(headers: &HeaderMap) -> String {
    let raw = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    raw.chars().take(MAX_USER_AGENT_LEN).collect()
}
