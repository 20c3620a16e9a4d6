//! cloudsim-rs: Rust client for the cloud service simulators
//!
//! Talks to the small REST surfaces exposed in front of the simulated
//! object-storage bucket and message queue.
//!
//! # Example
//!
//! ```no_run
//! use cloudsim_rs::{ClientOptions, QueueClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QueueClient::new("localhost:8081", &ClientOptions::default())?;
//!
//!     let queue = client.messages().await?;
//!     println!("{}: {} visible", queue.queue_name, queue.visible_count);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{ObjectStoreClient, QueueClient};
pub use config::{ClientOptions, DEFAULT_BUCKET_PORT, DEFAULT_QUEUE_PORT, endpoint_url};
pub use error::SimError;
pub use types::{BucketListing, FileEntry, Message, QueueSnapshot, SendReceipt};
