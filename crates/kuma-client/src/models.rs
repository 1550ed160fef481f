//! Uptime Kuma API models
//!
//! These models match the JSON bodies of the maintenance and monitor
//! relationship endpoints.

use serde::{Deserialize, Serialize};

/// Maintenance window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Maintenance {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
    /// Scheduling strategy, e.g. "manual", "single", "recurring-interval"
    #[serde(default)]
    pub strategy: String,
}

/// Monitor (only the fields the relation resources need)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Monitor {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub monitor_type: String,
    #[serde(default)]
    pub active: bool,
}

/// Reference to another object by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

/// Body of GET/PUT `/api/maintenances/{id}/status-pages`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStatusPages {
    pub status_pages: Vec<IdRef>,
}

/// Body of GET/PUT `/api/maintenances/{id}/monitors`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceMonitors {
    pub monitors: Vec<IdRef>,
}

/// A tag attached to a monitor
///
/// `value` is sent as JSON `null` when unset; `""` is a distinct, empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorTag {
    pub tag_id: i64,
    #[serde(default)]
    pub value: Option<String>,
}

/// Body of GET/PUT `/api/monitors/{id}/tags`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorTags {
    pub tags: Vec<MonitorTag>,
}

impl From<&[i64]> for MaintenanceStatusPages {
    fn from(ids: &[i64]) -> Self {
        Self {
            status_pages: ids.iter().map(|&id| IdRef { id }).collect(),
        }
    }
}

impl From<&[i64]> for MaintenanceMonitors {
    fn from(ids: &[i64]) -> Self {
        Self {
            monitors: ids.iter().map(|&id| IdRef { id }).collect(),
        }
    }
}
