//! Shared constants
//!
//! Refresh intervals and the user-facing fallback messages.

/// Default refresh intervals (in milliseconds)
pub mod refresh_intervals {
    /// Bucket listings change slowly
    pub const BUCKET_MS: u64 = 10_000;

    /// Queue contents and counts change quickly
    pub const QUEUE_MS: u64 = 5_000;
}

/// Messages written to `last_error` when the service gives none
pub mod messages {
    pub const CONNECT_FAILED: &str = "Failed to connect to server";
    pub const FETCH_FILES_FAILED: &str = "Failed to fetch files";
    pub const FETCH_MESSAGES_FAILED: &str = "Failed to fetch messages";
    pub const SEND_FAILED: &str = "Failed to send message";
    pub const DELETE_FAILED: &str = "Failed to delete message";
}

/// Maximum length of an identifier-like key stem
pub const MAX_IDENTIFIER_LEN: usize = 39;

/// Characters shown for digests and receipt handles before eliding
pub const TOKEN_PREVIEW_LEN: usize = 8;
