//! Monitors attached to a maintenance window

use crate::RelationSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// MaintenanceMonitorsSpec declares which monitors a maintenance window silences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MaintenanceMonitorsSpec {
    /// Maintenance window ID (immutable; changing it replaces the resource)
    pub maintenance_id: i64,

    /// Monitor IDs. An empty list detaches every monitor.
    pub monitor_ids: Vec<i64>,
}

impl RelationSpec for MaintenanceMonitorsSpec {
    const RESOURCE_TYPE: &'static str = "kuma_maintenance_monitors";

    fn parent_id(&self) -> i64 {
        self.maintenance_id
    }
}
