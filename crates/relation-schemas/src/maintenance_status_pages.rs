//! Status pages attached to a maintenance window

use crate::RelationSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// MaintenanceStatusPagesSpec declares which status pages show a maintenance window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MaintenanceStatusPagesSpec {
    /// Maintenance window ID (immutable; changing it replaces the resource)
    pub maintenance_id: i64,

    /// Status page IDs. An empty list detaches every status page.
    pub status_page_ids: Vec<i64>,
}

impl RelationSpec for MaintenanceStatusPagesSpec {
    const RESOURCE_TYPE: &'static str = "kuma_maintenance_status_pages";

    fn parent_id(&self) -> i64 {
        self.maintenance_id
    }
}
