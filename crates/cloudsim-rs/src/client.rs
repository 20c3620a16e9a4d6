//! HTTP clients for the simulator services
//!
//! Each simulator exposes a tiny REST surface; these clients wrap it and
//! translate transport failures and `{ "error": ... }` payloads into
//! [`SimError`].

use crate::config::{ClientOptions, DEFAULT_BUCKET_PORT, DEFAULT_QUEUE_PORT, endpoint_url};
use crate::error::SimError;
use crate::types::{
    BucketListing, DeleteMessageRequest, ErrorBody, QueueSnapshot, SendMessageRequest,
    SendReceipt,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Build the shared reqwest client
fn build_http(options: &ClientOptions) -> Result<Client, SimError> {
    Client::builder()
        .timeout(options.request_timeout)
        .connect_timeout(options.connect_timeout)
        .build()
        .map_err(|e| SimError::ClientBuild(e.to_string()))
}

/// Decode a response: JSON body on success, `{ error }` payload otherwise
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SimError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(SimError::from);
    }
    Err(application_error(response).await)
}

/// Accept any success response, ignoring its body
async fn read_ack(response: Response) -> Result<(), SimError> {
    if response.status().is_success() {
        return Ok(());
    }
    Err(application_error(response).await)
}

async fn application_error(response: Response) -> SimError {
    let status = response.status().as_u16();
    // The body may be empty or not JSON at all; that only loses the message.
    let message = match response.text().await {
        Ok(text) => serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty()),
        Err(e) => {
            tracing::debug!("Failed to read error body: {}", e);
            None
        }
    };
    SimError::Application { status, message }
}

/// Client for the object-storage simulator (`GET /files`)
#[derive(Debug, Clone)]
pub struct ObjectStoreClient {
    http: Client,
    base_url: String,
}

impl ObjectStoreClient {
    /// Create a client for the given endpoint (port defaults to 8080)
    pub fn new(endpoint: &str, options: &ClientOptions) -> Result<Self, SimError> {
        Ok(Self {
            http: build_http(options)?,
            base_url: endpoint_url(endpoint, DEFAULT_BUCKET_PORT)?,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the objects in the simulated bucket
    pub async fn list_files(&self) -> Result<BucketListing, SimError> {
        let url = format!("{}/files", self.base_url);
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }
}

/// Client for the message-queue simulator
#[derive(Debug, Clone)]
pub struct QueueClient {
    http: Client,
    base_url: String,
}

impl QueueClient {
    /// Create a client for the given endpoint (port defaults to 8081)
    pub fn new(endpoint: &str, options: &ClientOptions) -> Result<Self, SimError> {
        Ok(Self {
            http: build_http(options)?,
            base_url: endpoint_url(endpoint, DEFAULT_QUEUE_PORT)?,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Receive the currently visible messages plus approximate counts
    ///
    /// Note that on a real queue this leases the returned messages, which
    /// is why they show up as in-flight on the next poll.
    pub async fn messages(&self) -> Result<QueueSnapshot, SimError> {
        let url = format!("{}/messages", self.base_url);
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    /// Send a message with the given body
    pub async fn send_message(&self, body: &str) -> Result<SendReceipt, SimError> {
        let url = format!("{}/send-message", self.base_url);
        tracing::debug!("POST {} ({} bytes)", url, body.len());
        let response = self
            .http
            .post(&url)
            .json(&SendMessageRequest { message: body })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(application_error(response).await);
        }
        // The receipt is informational; a body we cannot read is still a send.
        match response.json::<SendReceipt>().await {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                tracing::debug!("Send succeeded with unreadable receipt: {}", e);
                Ok(SendReceipt::default())
            }
        }
    }

    /// Delete the message currently leased under `receipt_handle`
    pub async fn delete_message(&self, receipt_handle: &str) -> Result<(), SimError> {
        let url = format!("{}/delete-message", self.base_url);
        tracing::debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .json(&DeleteMessageRequest { receipt_handle })
            .send()
            .await?;
        read_ack(response).await
    }
}
