//! KumaClient trait for mocking
//!
//! This trait abstracts the KumaClient to enable mocking in unit tests.
//! The concrete KumaClient implements this trait, and tests can use mock implementations.

use crate::error::KumaError;
use crate::models::*;

/// Trait for Uptime Kuma API client operations
///
/// This trait enables mocking of Uptime Kuma API calls for unit testing.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
///
/// Relation writes replace the whole collection; there is no incremental
/// add/remove endpoint.
#[async_trait::async_trait]
pub trait KumaClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the API token
    async fn validate_token(&self) -> Result<(), KumaError>;

    // Maintenance Operations
    async fn get_maintenance(&self, id: i64) -> Result<Maintenance, KumaError>;
    async fn get_maintenance_status_pages(&self, id: i64) -> Result<Vec<i64>, KumaError>;
    async fn set_maintenance_status_pages(&self, id: i64, status_page_ids: &[i64]) -> Result<(), KumaError>;
    async fn get_maintenance_monitors(&self, id: i64) -> Result<Vec<i64>, KumaError>;
    async fn set_maintenance_monitors(&self, id: i64, monitor_ids: &[i64]) -> Result<(), KumaError>;

    // Monitor Operations
    async fn get_monitor(&self, id: i64) -> Result<Monitor, KumaError>;
    async fn get_monitor_tags(&self, id: i64) -> Result<Vec<MonitorTag>, KumaError>;
    async fn set_monitor_tags(&self, id: i64, tags: &[MonitorTag]) -> Result<(), KumaError>;
}
