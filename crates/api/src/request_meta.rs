//! Visitor metadata pulled from request headers and the connection.
//!
//! Nothing here fails: anything missing or unreadable becomes an empty
//! string.

use std::net::SocketAddr;

use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;

/// Resolve the client IP.
///
/// With `trust_forwarded_for`, the left-most `X-Forwarded-For` entry (the
/// original client as reported by the proxy chain) wins. Otherwise, or if
/// the header is absent, the socket peer address is used.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        if let Some(ip) = forwarded_for(headers) {
            return ip;
        }
    }
    peer.map(|addr| addr.ip().to_string()).unwrap_or_default()
}

/// The `User-Agent` header, or an empty string.
pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
