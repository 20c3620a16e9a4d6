//! Queue mutations
//!
//! Sends and deletes go through a [`MutationGateway`]. A successful write
//! asks the queue's [`PollingController`] for an immediate read; nothing is
//! patched into the snapshot locally.

use crate::constants::messages;
use crate::errors::format_mutation_error;
use crate::formatting::short_token;
use crate::polling::{PollingController, ResourceSource};
use async_trait::async_trait;
use cloudsim_rs::{SendReceipt, SimError};

/// Write side of a queue
#[async_trait]
pub trait QueueWriter: Send + Sync {
    async fn send_message(&self, body: &str) -> Result<SendReceipt, SimError>;

    async fn delete_message(&self, receipt_handle: &str) -> Result<(), SimError>;
}

/// Result of a send or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Refused locally, nothing was sent
    Rejected,
    /// The service accepted the write and a refresh was issued
    Committed,
    /// The service refused the write or could not be reached
    Failed(String),
}

impl MutationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed)
    }
}

/// Authoring state of the send-message dialog
#[derive(Debug, Clone, Default)]
pub struct Composer {
    body: String,
    open: bool,
    sending: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Open the dialog, keeping any text typed earlier
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn push(&mut self, c: char) {
        self.body.push(c);
    }

    pub fn newline(&mut self) {
        self.body.push('\n');
    }

    pub fn backspace(&mut self) {
        self.body.pop();
    }

    /// Whether the current body may be sent
    pub fn can_submit(&self) -> bool {
        !self.sending && !self.body.trim().is_empty()
    }

    /// Flag the dialog as sending so it can be drawn before the request
    ///
    /// Returns false, leaving the state untouched, if the body may not be
    /// sent.
    pub fn begin_send(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.sending = true;
        true
    }

    /// Clear the body and close the dialog
    pub fn reset(&mut self) {
        self.body.clear();
        self.open = false;
        self.sending = false;
    }
}

/// Turns user writes into write-then-refresh sequences
#[derive(Debug, Clone)]
pub struct MutationGateway<W> {
    writer: W,
}

impl<W: QueueWriter> MutationGateway<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Send the composer's body
    ///
    /// On success the composer is reset and `queue` refreshes. On failure
    /// the dialog and its text stay, and the error goes to the queue
    /// snapshot. A composer already flagged by [`Composer::begin_send`]
    /// is sent as well.
    pub async fn send<S: ResourceSource>(
        &self,
        composer: &mut Composer,
        queue: &mut PollingController<S>,
    ) -> MutationOutcome {
        if composer.body.trim().is_empty() {
            composer.sending = false;
            return MutationOutcome::Rejected;
        }

        composer.sending = true;
        let result = self.writer.send_message(&composer.body).await;
        composer.sending = false;

        match result {
            Ok(receipt) => {
                tracing::info!(
                    "Sent message {}",
                    receipt.message_id.as_deref().unwrap_or("(no id)")
                );
                composer.reset();
                queue.refresh_now();
                MutationOutcome::Committed
            }
            Err(e) => {
                tracing::warn!("Failed to send message: {}", e);
                let message = format_mutation_error(&e, messages::SEND_FAILED);
                queue.snapshot_mut().set_error(&message);
                MutationOutcome::Failed(message)
            }
        }
    }

    /// Delete the message leased under `receipt_handle`
    pub async fn delete<S: ResourceSource>(
        &self,
        receipt_handle: &str,
        queue: &mut PollingController<S>,
    ) -> MutationOutcome {
        match self.writer.delete_message(receipt_handle).await {
            Ok(()) => {
                tracing::info!("Deleted message (handle {})", short_token(receipt_handle));
                queue.refresh_now();
                MutationOutcome::Committed
            }
            Err(e) => {
                tracing::warn!("Failed to delete message: {}", e);
                let message = format_mutation_error(&e, messages::DELETE_FAILED);
                queue.snapshot_mut().set_error(&message);
                MutationOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polling::tests::ScriptedSource;
    use cloudsim_rs::{Message, QueueSnapshot};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeWriter {
        sent: Mutex<Vec<String>>,
        deleted: Mutex<Vec<String>>,
        failures: Mutex<VecDeque<SimError>>,
    }

    impl FakeWriter {
        fn failing(error: SimError) -> Self {
            let writer = Self::default();
            writer.failures.lock().unwrap().push_back(error);
            writer
        }

        fn next_failure(&self) -> Option<SimError> {
            self.failures.lock().unwrap().pop_front()
        }
    }

    #[async_trait]
    impl QueueWriter for FakeWriter {
        async fn send_message(&self, body: &str) -> Result<SendReceipt, SimError> {
            self.sent.lock().unwrap().push(body.to_string());
            match self.next_failure() {
                Some(e) => Err(e),
                None => Ok(SendReceipt {
                    message_id: Some("m-1".to_string()),
                    md5_of_body: None,
                }),
            }
        }

        async fn delete_message(&self, receipt_handle: &str) -> Result<(), SimError> {
            self.deleted.lock().unwrap().push(receipt_handle.to_string());
            match self.next_failure() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn queue_full() -> SimError {
        SimError::Application {
            status: 500,
            message: Some("queue full".to_string()),
        }
    }

    fn composer_with(text: &str) -> Composer {
        let mut composer = Composer::new();
        composer.open();
        text.chars().for_each(|c| composer.push(c));
        composer
    }

    #[test]
    fn test_composer_editing() {
        let mut composer = Composer::new();
        assert!(!composer.can_submit());

        composer.open();
        composer.push('h');
        composer.push('i');
        composer.newline();
        composer.push('!');
        assert_eq!(composer.body(), "hi\n!");

        composer.backspace();
        assert_eq!(composer.body(), "hi\n");
        assert!(composer.can_submit());

        composer.close();
        assert!(!composer.is_open());
        assert_eq!(composer.body(), "hi\n");

        composer.reset();
        assert_eq!(composer.body(), "");
    }

    #[tokio::test]
    async fn test_blank_body_is_rejected_without_a_call() {
        let gateway = MutationGateway::new(FakeWriter::default());
        let mut queue = PollingController::new(ScriptedSource::new(), String::new());

        for text in ["", "   ", "\n\t "] {
            let mut composer = composer_with(text);
            let outcome = gateway.send(&mut composer, &mut queue).await;
            assert_eq!(outcome, MutationOutcome::Rejected);
            assert!(composer.is_open());
        }

        assert!(gateway.writer().sent.lock().unwrap().is_empty());
        assert_eq!(queue.reads_issued(), 0);
    }

    #[tokio::test]
    async fn test_send_success_resets_composer_and_refreshes() {
        let gateway = MutationGateway::new(FakeWriter::default());
        let mut queue = PollingController::new(ScriptedSource::new(), String::new());
        let mut composer = composer_with("  hello queue ");

        let outcome = gateway.send(&mut composer, &mut queue).await;

        assert!(outcome.is_committed());
        assert_eq!(
            gateway.writer().sent.lock().unwrap().as_slice(),
            ["  hello queue ".to_string()]
        );
        assert_eq!(composer.body(), "");
        assert!(!composer.is_open());
        assert!(!composer.is_sending());
        assert_eq!(queue.reads_issued(), 1);

        queue.settle().await;
        assert_eq!(queue.snapshot().data(), "read-1");
    }

    #[tokio::test]
    async fn test_send_failure_keeps_body_and_sets_error() {
        let gateway = MutationGateway::new(FakeWriter::failing(queue_full()));
        let mut queue = PollingController::new(ScriptedSource::new(), "existing".to_string());
        let mut composer = composer_with("keep me");

        let outcome = gateway.send(&mut composer, &mut queue).await;

        assert_eq!(outcome, MutationOutcome::Failed("queue full".to_string()));
        assert_eq!(queue.snapshot().last_error(), Some("queue full"));
        assert_eq!(queue.snapshot().data(), "existing");
        assert_eq!(composer.body(), "keep me");
        assert!(composer.is_open());
        assert!(!composer.is_sending());
        assert_eq!(queue.reads_issued(), 0);
    }

    #[tokio::test]
    async fn test_send_unreachable_uses_fallback() {
        let gateway = MutationGateway::new(FakeWriter::failing(SimError::Connection(
            "connection refused".to_string(),
        )));
        let mut queue = PollingController::new(ScriptedSource::new(), String::new());
        let mut composer = composer_with("hello");

        gateway.send(&mut composer, &mut queue).await;
        assert_eq!(queue.snapshot().last_error(), Some("Failed to send message"));
    }

    /// Queue source that never changes
    struct FixedQueue;

    #[async_trait]
    impl ResourceSource for FixedQueue {
        type Output = QueueSnapshot;
        const RESOURCE: &'static str = "messages";
        const FAILURE_MESSAGE: &'static str = messages::FETCH_MESSAGES_FAILED;

        async fn fetch(&self) -> Result<QueueSnapshot, SimError> {
            Ok(QueueSnapshot::default())
        }
    }

    fn leased_queue(receipt_handle: &str) -> QueueSnapshot {
        QueueSnapshot {
            queue_name: "orders".to_string(),
            visible_count: 1,
            messages: vec![Message {
                message_id: "m-1".to_string(),
                body: "hello".to_string(),
                md5_of_body: "5d41402abc4b2a76b9719d911017c592".to_string(),
                receipt_handle: receipt_handle.to_string(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_message() {
        let gateway = MutationGateway::new(FakeWriter::failing(SimError::Application {
            status: 400,
            message: None,
        }));
        let mut queue = PollingController::new(FixedQueue, leased_queue("stale-handle"));

        let outcome = gateway.delete("stale-handle", &mut queue).await;

        assert_eq!(
            outcome,
            MutationOutcome::Failed("Failed to delete message".to_string())
        );
        assert!(queue.snapshot().data().find_by_receipt("stale-handle").is_some());
        assert_eq!(queue.snapshot().data().len(), 1);
        assert_eq!(
            queue.snapshot().last_error(),
            Some("Failed to delete message")
        );
        assert_eq!(queue.reads_issued(), 0);
    }

    #[tokio::test]
    async fn test_begin_send_then_send() {
        let gateway = MutationGateway::new(FakeWriter::default());
        let mut queue = PollingController::new(ScriptedSource::new(), String::new());
        let mut composer = composer_with("hello");

        assert!(composer.begin_send());
        assert!(composer.is_sending());
        assert!(!composer.can_submit());
        assert!(!composer.begin_send());

        let outcome = gateway.send(&mut composer, &mut queue).await;
        assert!(outcome.is_committed());
        assert!(!composer.is_sending());
        assert_eq!(gateway.writer().sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_begin_send_refuses_blank_body() {
        let mut composer = composer_with("  ");
        assert!(!composer.begin_send());
        assert!(!composer.is_sending());
    }

    #[tokio::test]
    async fn test_delete_success_refreshes() {
        let gateway = MutationGateway::new(FakeWriter::default());
        let mut queue = PollingController::new(ScriptedSource::new(), String::new());

        let outcome = gateway.delete("handle-1", &mut queue).await;

        assert!(outcome.is_committed());
        assert_eq!(
            gateway.writer().deleted.lock().unwrap().as_slice(),
            ["handle-1".to_string()]
        );
        assert_eq!(queue.reads_issued(), 1);
        assert!(queue.snapshot().is_loading());
    }
}
