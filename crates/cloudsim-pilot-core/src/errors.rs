//! Error formatting utilities
//!
//! Converts [`SimError`] into the messages written to a snapshot's
//! `last_error`.

use crate::constants::messages;
use cloudsim_rs::SimError;

/// Format a SimError for display
///
/// Service-provided messages are shown verbatim. Transport failures get
/// the generic connection message. Everything else falls back to the
/// per-operation `fallback` text.
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::errors::format_sim_error;
/// use cloudsim_rs::SimError;
///
/// let error = SimError::Application { status: 500, message: Some("queue full".into()) };
/// assert_eq!(format_sim_error(&error, "Failed to send message"), "queue full");
///
/// let error = SimError::Connection("connection refused".into());
/// assert_eq!(format_sim_error(&error, "Failed to send message"), "Failed to connect to server");
/// ```
pub fn format_sim_error(error: &SimError, fallback: &str) -> String {
    match error {
        SimError::Connection(_) => messages::CONNECT_FAILED.to_string(),
        SimError::Application {
            message: Some(msg), ..
        } => msg.clone(),
        SimError::Application { message: None, .. } | SimError::Decode(_) => fallback.to_string(),
        SimError::InvalidEndpoint(_) | SimError::ClientBuild(_) => error.to_string(),
    }
}

/// Format a failed send or delete
///
/// Like [`format_sim_error`], except that a request that never reached the
/// service reports the operation's own fallback.
pub fn format_mutation_error(error: &SimError, fallback: &str) -> String {
    match error {
        SimError::Connection(_) => fallback.to_string(),
        _ => format_sim_error(error, fallback),
    }
}

/// Categorize an error for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Service unreachable
    Network,
    /// Request timed out
    Timeout,
    /// Service answered with an error
    Application,
    /// Service answered with something we could not read
    Decode,
    /// Bad endpoint or client setup
    Config,
}

impl ErrorCategory {
    /// Get a short label for the category
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Network",
            ErrorCategory::Timeout => "Timeout",
            ErrorCategory::Application => "Server",
            ErrorCategory::Decode => "Protocol",
            ErrorCategory::Config => "Config",
        }
    }
}

/// Categorize a SimError
pub fn categorize_error(error: &SimError) -> ErrorCategory {
    match error {
        SimError::Connection(_) if error.is_timeout() => ErrorCategory::Timeout,
        SimError::Connection(_) => ErrorCategory::Network,
        SimError::Application { .. } => ErrorCategory::Application,
        SimError::Decode(_) => ErrorCategory::Decode,
        SimError::InvalidEndpoint(_) | SimError::ClientBuild(_) => ErrorCategory::Config,
    }
}
