//! Wire types for the simulator REST APIs

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A single object in a bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Object key (unique within a listing)
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Last-modified timestamp as sent by the server (ISO-8601)
    pub last_modified: String,
}

/// Response of `GET /files`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketListing {
    #[serde(rename = "bucket", default)]
    pub bucket_name: String,
    /// Objects in server order
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl BucketListing {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A visible message returned by `GET /messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,
    pub body: String,
    pub md5_of_body: String,
    /// Opaque token for the current delivery; only valid until the message
    /// is deleted or becomes visible again
    pub receipt_handle: String,
}

/// Response of `GET /messages`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    #[serde(default)]
    pub queue_name: String,
    #[serde(default)]
    pub queue_url: Option<String>,
    /// Approximate number of visible messages
    #[serde(
        rename = "approximateNumberOfMessages",
        default,
        deserialize_with = "lenient_count"
    )]
    pub visible_count: u64,
    /// Approximate number of in-flight (not visible) messages
    #[serde(
        rename = "approximateNumberOfMessagesNotVisible",
        default,
        deserialize_with = "lenient_count"
    )]
    pub in_flight_count: u64,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl QueueSnapshot {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Find a message by its receipt handle
    pub fn find_by_receipt(&self, receipt_handle: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.receipt_handle == receipt_handle)
    }
}

/// Response of a successful `POST /send-message`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub md5_of_body: Option<String>,
}

/// Request body of `POST /send-message`
#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub message: &'a str,
}

/// Request body of `POST /delete-message`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteMessageRequest<'a> {
    pub receipt_handle: &'a str,
}

/// Error payload sent with non-success responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// The queue simulator reports counts as decimal strings ("3"); accept
/// strings, numbers, or null, falling back to 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Count::deserialize(deserializer)? {
        Count::Number(n) => n,
        Count::Text(s) => s.trim().parse().unwrap_or(0),
        Count::Other(_) => 0,
    })
}
