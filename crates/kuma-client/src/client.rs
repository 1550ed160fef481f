//! Uptime Kuma API client
//!
//! Implements the relationship endpoints of the Uptime Kuma REST API:
//! /api/maintenances/{id}/status-pages, /api/maintenances/{id}/monitors and
//! /api/monitors/{id}/tags.

use crate::common::HttpClient;
use crate::error::KumaError;
use crate::kuma_trait::KumaClientTrait;
use crate::models::*;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default HTTP timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Uptime Kuma API client
#[derive(Debug, Clone)]
pub struct KumaClient {
    http: HttpClient,
}

impl KumaClient {
    /// Create a new Uptime Kuma client
    ///
    /// # Arguments
    /// * `base_url` - Uptime Kuma base URL (e.g., "http://uptime-kuma:3001")
    /// * `token` - API token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, KumaError> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a new Uptime Kuma client with a custom HTTP timeout
    pub fn with_timeout(base_url: String, token: String, timeout: Duration) -> Result<Self, KumaError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KumaError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url, token),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Validate the API token by making a simple authenticated request.
    ///
    /// # Returns
    /// * `Ok(())` - Token is valid and Uptime Kuma is reachable
    /// * `Err(KumaError)` - Token is invalid or Uptime Kuma is unreachable
    pub async fn validate_token(&self) -> Result<(), KumaError> {
        debug!("Validating Uptime Kuma token and connectivity");
        let _: serde_json::Value = self.http.get("/api/status").await?;
        debug!("Token validated successfully");
        Ok(())
    }

    /// Get a maintenance window by ID
    pub async fn get_maintenance(&self, id: i64) -> Result<Maintenance, KumaError> {
        debug!("Fetching maintenance {} from Uptime Kuma", id);
        self.http.get(&format!("/api/maintenances/{}", id)).await
    }

    /// Get the status page IDs attached to a maintenance window
    pub async fn get_maintenance_status_pages(&self, id: i64) -> Result<Vec<i64>, KumaError> {
        let body: MaintenanceStatusPages = self
            .http
            .get(&format!("/api/maintenances/{}/status-pages", id))
            .await?;
        Ok(body.status_pages.into_iter().map(|r| r.id).collect())
    }

    /// Replace the status pages attached to a maintenance window
    pub async fn set_maintenance_status_pages(&self, id: i64, status_page_ids: &[i64]) -> Result<(), KumaError> {
        debug!("Setting {} status pages on maintenance {}", status_page_ids.len(), id);
        self.http
            .put(
                &format!("/api/maintenances/{}/status-pages", id),
                &MaintenanceStatusPages::from(status_page_ids),
            )
            .await
    }

    /// Get the monitor IDs attached to a maintenance window
    pub async fn get_maintenance_monitors(&self, id: i64) -> Result<Vec<i64>, KumaError> {
        let body: MaintenanceMonitors = self
            .http
            .get(&format!("/api/maintenances/{}/monitors", id))
            .await?;
        Ok(body.monitors.into_iter().map(|r| r.id).collect())
    }

    /// Replace the monitors attached to a maintenance window
    pub async fn set_maintenance_monitors(&self, id: i64, monitor_ids: &[i64]) -> Result<(), KumaError> {
        debug!("Setting {} monitors on maintenance {}", monitor_ids.len(), id);
        self.http
            .put(
                &format!("/api/maintenances/{}/monitors", id),
                &MaintenanceMonitors::from(monitor_ids),
            )
            .await
    }

    /// Get a monitor by ID
    pub async fn get_monitor(&self, id: i64) -> Result<Monitor, KumaError> {
        debug!("Fetching monitor {} from Uptime Kuma", id);
        self.http.get(&format!("/api/monitors/{}", id)).await
    }

    /// Get the tags attached to a monitor
    pub async fn get_monitor_tags(&self, id: i64) -> Result<Vec<MonitorTag>, KumaError> {
        let body: MonitorTags = self.http.get(&format!("/api/monitors/{}/tags", id)).await?;
        Ok(body.tags)
    }

    /// Replace the tags attached to a monitor
    pub async fn set_monitor_tags(&self, id: i64, tags: &[MonitorTag]) -> Result<(), KumaError> {
        debug!("Setting {} tags on monitor {}", tags.len(), id);
        let body = MonitorTags { tags: tags.to_vec() };
        self.http.put(&format!("/api/monitors/{}/tags", id), &body).await
    }
}

#[async_trait::async_trait]
impl KumaClientTrait for KumaClient {
    fn base_url(&self) -> &str {
        KumaClient::base_url(self)
    }

    async fn validate_token(&self) -> Result<(), KumaError> {
        KumaClient::validate_token(self).await
    }

    async fn get_maintenance(&self, id: i64) -> Result<Maintenance, KumaError> {
        KumaClient::get_maintenance(self, id).await
    }

    async fn get_maintenance_status_pages(&self, id: i64) -> Result<Vec<i64>, KumaError> {
        KumaClient::get_maintenance_status_pages(self, id).await
    }

    async fn set_maintenance_status_pages(&self, id: i64, status_page_ids: &[i64]) -> Result<(), KumaError> {
        KumaClient::set_maintenance_status_pages(self, id, status_page_ids).await
    }

    async fn get_maintenance_monitors(&self, id: i64) -> Result<Vec<i64>, KumaError> {
        KumaClient::get_maintenance_monitors(self, id).await
    }

    async fn set_maintenance_monitors(&self, id: i64, monitor_ids: &[i64]) -> Result<(), KumaError> {
        KumaClient::set_maintenance_monitors(self, id, monitor_ids).await
    }

    async fn get_monitor(&self, id: i64) -> Result<Monitor, KumaError> {
        KumaClient::get_monitor(self, id).await
    }

    async fn get_monitor_tags(&self, id: i64) -> Result<Vec<MonitorTag>, KumaError> {
        KumaClient::get_monitor_tags(self, id).await
    }

    async fn set_monitor_tags(&self, id: i64, tags: &[MonitorTag]) -> Result<(), KumaError> {
        KumaClient::set_monitor_tags(self, id, tags).await
    }
}
