//! Simulator clients as poll sources and queue writers

use crate::constants::messages;
use crate::mutation::QueueWriter;
use crate::polling::ResourceSource;
use async_trait::async_trait;
use cloudsim_rs::{BucketListing, ObjectStoreClient, QueueClient, QueueSnapshot, SendReceipt, SimError};

#[async_trait]
impl ResourceSource for ObjectStoreClient {
    type Output = BucketListing;
    const RESOURCE: &'static str = "files";
    const FAILURE_MESSAGE: &'static str = messages::FETCH_FILES_FAILED;

    async fn fetch(&self) -> Result<BucketListing, SimError> {
        self.list_files().await
    }
}

#[async_trait]
impl ResourceSource for QueueClient {
    type Output = QueueSnapshot;
    const RESOURCE: &'static str = "messages";
    const FAILURE_MESSAGE: &'static str = messages::FETCH_MESSAGES_FAILED;

    async fn fetch(&self) -> Result<QueueSnapshot, SimError> {
        self.messages().await
    }
}

#[async_trait]
impl QueueWriter for QueueClient {
    async fn send_message(&self, body: &str) -> Result<SendReceipt, SimError> {
        QueueClient::send_message(self, body).await
    }

    async fn delete_message(&self, receipt_handle: &str) -> Result<(), SimError> {
        QueueClient::delete_message(self, receipt_handle).await
    }
}

/// Poller for the object-storage simulator
pub type BucketPoller = crate::polling::PollingController<ObjectStoreClient>;

/// Poller for the message-queue simulator
pub type QueuePoller = crate::polling::PollingController<QueueClient>;
