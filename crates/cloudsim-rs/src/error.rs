//! Error type for simulator API calls

use thiserror::Error;

/// Errors returned by the simulator clients
#[derive(Debug, Error)]
pub enum SimError {
    /// The request never produced a response (refused, DNS, timeout)
    #[error("connection failed: {0}")]
    Connection(String),

    /// The service answered with a non-success status
    ///
    /// `message` carries the `error` field of the response body when the
    /// service sent one.
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Application { status: u16, message: Option<String> },

    /// A success response whose body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),

    /// An endpoint string that cannot be turned into a URL
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl SimError {
    /// Whether this error came from the transport rather than the service
    pub fn is_connectivity(&self) -> bool {
        matches!(self, SimError::Connection(_))
    }

    /// The server-provided message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            SimError::Application { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the transport reported a timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            SimError::Connection(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("timed out") || lower.contains("timeout")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SimError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SimError::Decode(err.to_string())
        } else if err.is_builder() {
            SimError::ClientBuild(err.to_string())
        } else if err.is_timeout() {
            SimError::Connection(format!("request timed out: {}", err))
        } else {
            SimError::Connection(err.to_string())
        }
    }
}
