//! Mock KumaClient for unit testing
//!
//! This module provides a mock implementation of KumaClientTrait that can be used
//! in unit tests without requiring a running Uptime Kuma instance.
//!
//! The mock is organized into domain-specific modules:
//! - `maintenance.rs` - Maintenance windows and their status page / monitor relations
//! - `monitor.rs` - Monitors and their tags
//! - `helpers.rs` - Helper functions for building test models

mod helpers;
mod maintenance;
mod monitor;

pub use helpers::{test_maintenance, test_monitor};

use crate::error::KumaError;
use crate::kuma_trait::KumaClientTrait;
use crate::models::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock KumaClient for testing
///
/// This mock stores resources in memory and can be configured to return
/// specific responses for testing different scenarios. Every trait call is
/// counted by operation name so tests can assert how many writes happened.
#[derive(Debug, Clone)]
pub struct MockKumaClient {
    pub(crate) base_url: String,
    // In-memory storage for resources
    pub(crate) maintenances: Arc<Mutex<HashMap<i64, Maintenance>>>,
    pub(crate) maintenance_status_pages: Arc<Mutex<HashMap<i64, Vec<i64>>>>,
    pub(crate) maintenance_monitors: Arc<Mutex<HashMap<i64, Vec<i64>>>>,
    pub(crate) monitors: Arc<Mutex<HashMap<i64, Monitor>>>,
    pub(crate) monitor_tags: Arc<Mutex<HashMap<i64, Vec<MonitorTag>>>>,
    // Number of upcoming relation writes to reject with a conflict
    pub(crate) pending_conflicts: Arc<Mutex<u32>>,
    // Error message returned by every call while set
    pub(crate) failure: Arc<Mutex<Option<String>>>,
    pub(crate) calls: Arc<Mutex<HashMap<&'static str, u32>>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<i64>>,
}

impl MockKumaClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            maintenances: Arc::new(Mutex::new(HashMap::new())),
            maintenance_status_pages: Arc::new(Mutex::new(HashMap::new())),
            maintenance_monitors: Arc::new(Mutex::new(HashMap::new())),
            monitors: Arc::new(Mutex::new(HashMap::new())),
            monitor_tags: Arc::new(Mutex::new(HashMap::new())),
            pending_conflicts: Arc::new(Mutex::new(0)),
            failure: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a maintenance window to the mock store (for test setup)
    pub fn add_maintenance(&self, maintenance: Maintenance) {
        self.maintenance_status_pages.lock().unwrap().entry(maintenance.id).or_default();
        self.maintenance_monitors.lock().unwrap().entry(maintenance.id).or_default();
        self.maintenances.lock().unwrap().insert(maintenance.id, maintenance);
    }

    /// Create a maintenance window with a generated ID (for test setup)
    pub fn create_maintenance(&self, title: &str) -> Maintenance {
        let maintenance = test_maintenance(self.next_id(), title);
        self.add_maintenance(maintenance.clone());
        maintenance
    }

    /// Delete a maintenance window and its relations, as if removed out of band
    pub fn remove_maintenance(&self, id: i64) {
        self.maintenances.lock().unwrap().remove(&id);
        self.maintenance_status_pages.lock().unwrap().remove(&id);
        self.maintenance_monitors.lock().unwrap().remove(&id);
    }

    /// Add a monitor to the mock store (for test setup)
    pub fn add_monitor(&self, monitor: Monitor) {
        self.monitor_tags.lock().unwrap().entry(monitor.id).or_default();
        self.monitors.lock().unwrap().insert(monitor.id, monitor);
    }

    /// Create a monitor with a generated ID (for test setup)
    pub fn create_monitor(&self, name: &str) -> Monitor {
        let monitor = test_monitor(self.next_id(), name);
        self.add_monitor(monitor.clone());
        monitor
    }

    /// Delete a monitor and its tags, as if removed out of band
    pub fn remove_monitor(&self, id: i64) {
        self.monitors.lock().unwrap().remove(&id);
        self.monitor_tags.lock().unwrap().remove(&id);
    }

    /// Reject the next `count` relation writes with `KumaError::Conflict`
    pub fn fail_next_writes_with_conflict(&self, count: u32) {
        *self.pending_conflicts.lock().unwrap() = count;
    }

    /// Fail every call with `KumaError::Api(message)` until cleared with `None`
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(|m| m.to_string());
    }

    /// Number of times the named trait operation was called
    pub fn call_count(&self, operation: &str) -> u32 {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    /// Total relation writes across every `set_*` operation
    pub fn write_count(&self) -> u32 {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name.starts_with("set_"))
            .map(|(_, count)| count)
            .sum()
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }

    /// Count a call and return the injected failure, if any
    pub(crate) fn record(&self, operation: &'static str) -> Result<(), KumaError> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(KumaError::Api(message.clone())),
            None => Ok(()),
        }
    }

    /// Consume one primed conflict, if any
    pub(crate) fn take_conflict(&self, what: &str) -> Result<(), KumaError> {
        let mut pending = self.pending_conflicts.lock().unwrap();
        if *pending > 0 {
            *pending -= 1;
            return Err(KumaError::Conflict(format!("{} was modified concurrently", what)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl KumaClientTrait for MockKumaClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_token(&self) -> Result<(), KumaError> {
        self.record("validate_token")
    }

    // Maintenance Operations - delegated to maintenance module
    async fn get_maintenance(&self, id: i64) -> Result<Maintenance, KumaError> {
        maintenance::get_maintenance(self, id).await
    }

    async fn get_maintenance_status_pages(&self, id: i64) -> Result<Vec<i64>, KumaError> {
        maintenance::get_maintenance_status_pages(self, id).await
    }

    async fn set_maintenance_status_pages(&self, id: i64, status_page_ids: &[i64]) -> Result<(), KumaError> {
        maintenance::set_maintenance_status_pages(self, id, status_page_ids).await
    }

    async fn get_maintenance_monitors(&self, id: i64) -> Result<Vec<i64>, KumaError> {
        maintenance::get_maintenance_monitors(self, id).await
    }

    async fn set_maintenance_monitors(&self, id: i64, monitor_ids: &[i64]) -> Result<(), KumaError> {
        maintenance::set_maintenance_monitors(self, id, monitor_ids).await
    }

    // Monitor Operations - delegated to monitor module
    async fn get_monitor(&self, id: i64) -> Result<Monitor, KumaError> {
        monitor::get_monitor(self, id).await
    }

    async fn get_monitor_tags(&self, id: i64) -> Result<Vec<MonitorTag>, KumaError> {
        monitor::get_monitor_tags(self, id).await
    }

    async fn set_monitor_tags(&self, id: i64, tags: &[MonitorTag]) -> Result<(), KumaError> {
        monitor::set_monitor_tags(self, id, tags).await
    }
}
