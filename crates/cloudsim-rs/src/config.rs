//! Endpoint and client settings
//!
//! Turns user-supplied endpoint strings into base URLs.

use crate::error::SimError;
use std::time::Duration;

/// Default port of the object-storage (file listing) service
pub const DEFAULT_BUCKET_PORT: u16 = 8080;

/// Default port of the message-queue service
pub const DEFAULT_QUEUE_PORT: u16 = 8081;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Settings shared by the simulator clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Total time allowed for one request
    pub request_timeout: Duration,
    /// Time allowed to establish the TCP connection
    pub connect_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Normalize an endpoint into a base URL without a trailing slash
///
/// Accepts `host`, `host:port`, `[v6]`, `[v6]:port` or a full URL.
/// A missing scheme becomes `http://` and a missing port becomes
/// `default_port`, with or without a scheme.
///
/// # Examples
///
/// ```
/// use cloudsim_rs::config::endpoint_url;
///
/// assert_eq!(endpoint_url("localhost", 8080).unwrap(), "http://localhost:8080");
/// assert_eq!(endpoint_url("10.0.0.5:9000", 8080).unwrap(), "http://10.0.0.5:9000");
/// assert_eq!(endpoint_url("https://sim.local/", 8080).unwrap(), "https://sim.local:8080");
/// ```
pub fn endpoint_url(endpoint: &str, default_port: u16) -> Result<String, SimError> {
    let e = endpoint.trim().trim_end_matches('/');
    if e.is_empty() || e.contains(char::is_whitespace) {
        return Err(SimError::InvalidEndpoint(endpoint.to_string()));
    }

    let (scheme, rest) = match e.split_once("://") {
        Some((scheme @ ("http" | "https"), rest)) => (scheme, rest),
        Some(_) => return Err(SimError::InvalidEndpoint(endpoint.to_string())),
        None => ("http", e),
    };

    // Anything after the first '/' is a path prefix and kept as is
    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    if authority.is_empty() {
        return Err(SimError::InvalidEndpoint(endpoint.to_string()));
    }

    Ok(format!(
        "{}://{}{}",
        scheme,
        authority_with_port(authority, default_port),
        path
    ))
}

/// Append `default_port` to an authority that has none
fn authority_with_port(authority: &str, default_port: u16) -> String {
    if authority.starts_with('[') {
        if authority.contains("]:") {
            authority.to_string()
        } else {
            format!("{}:{}", authority, default_port)
        }
    } else if authority.matches(':').count() > 1 {
        // Raw IPv6 without brackets
        format!("[{}]:{}", authority, default_port)
    } else if authority.contains(':') {
        authority.to_string()
    } else {
        format!("{}:{}", authority, default_port)
    }
}
