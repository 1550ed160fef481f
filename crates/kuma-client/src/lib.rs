//! Uptime Kuma REST API Client
//!
//! A Rust client library for the relationship endpoints of an Uptime Kuma
//! monitoring service: status pages and monitors attached to maintenance
//! windows, and tags attached to monitors.
//!
//! # Example
//!
//! ```no_run
//! use kuma_client::{KumaClient, KumaClientTrait, MonitorTag};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = KumaClient::new(
//!     "http://uptime-kuma:3001".to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! // Attach two status pages to maintenance window 3
//! client.set_maintenance_status_pages(3, &[1, 2]).await?;
//!
//! // Read the tags of monitor 12
//! let tags: Vec<MonitorTag> = client.get_monitor_tags(12).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Maintenance relations**: Read and replace status pages and monitors of a maintenance window
//! - **Monitor tags**: Read and replace the tags of a monitor, preserving `null` vs `""` values
//! - **Typed errors**: 404, 409 and 401/403 map to distinct `KumaError` variants
//! - **Mocking**: `MockKumaClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod kuma_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::KumaClient;
pub use common::HttpClient;
pub use error::KumaError;
pub use models::*;
pub use kuma_trait::KumaClientTrait;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockKumaClient;
