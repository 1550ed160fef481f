//! Gateway bindings for each relation resource type
//!
//! Each binding adapts one pair of Uptime Kuma endpoints (GET + PUT of a
//! whole collection) to the `MembershipGateway` contract:
//! - `maintenance_status_pages`: status pages shown for a maintenance window
//! - `maintenance_monitors`: monitors silenced by a maintenance window
//! - `monitor_tags`: tags attached to a monitor, with tri-state values

pub mod maintenance_monitors;
pub mod maintenance_status_pages;
pub mod monitor_tags;

pub use maintenance_monitors::MaintenanceMonitorsGateway;
pub use maintenance_status_pages::MaintenanceStatusPagesGateway;
pub use monitor_tags::MonitorTagsGateway;

use kuma_client::KumaError;
use membership::{GatewayError, Member, MembershipSet};
use tracing::{debug, warn};

/// Map a client error onto the gateway contract
pub(crate) fn gateway_error(parent: i64, error: KumaError) -> GatewayError {
    match error {
        KumaError::NotFound(_) => GatewayError::ParentNotFound(parent.to_string()),
        KumaError::Conflict(_) => GatewayError::Conflict(parent.to_string()),
        other => {
            if other.is_remote_rejection() {
                warn!("Uptime Kuma rejected a call for parent {}: {}", parent, other);
            } else {
                debug!("Call for parent {} failed in transport: {}", parent, other);
            }
            GatewayError::Remote(other.to_string())
        }
    }
}

/// Build a membership set from remote members
///
/// Duplicate ids from the remote side are reported as a remote failure.
pub(crate) fn observed_set(
    parent: i64,
    members: Vec<Member>,
    order_significant: bool,
) -> Result<MembershipSet, GatewayError> {
    MembershipSet::new(members, order_significant).map_err(|e| {
        GatewayError::Remote(format!("parent {} returned an invalid collection: {}", parent, e))
    })
}

/// Integer child ids of a set, in set order
pub(crate) fn member_ids(parent: i64, members: &MembershipSet) -> Result<Vec<i64>, GatewayError> {
    members
        .members()
        .iter()
        .map(|m| {
            m.child_id.as_i64().ok_or_else(|| {
                GatewayError::Remote(format!(
                    "parent {}: child id '{}' is not numeric",
                    parent, m.child_id
                ))
            })
        })
        .collect()
}

/// Integer child ids of a set, skipping anything non-numeric
pub(crate) fn numeric_ids(members: &MembershipSet) -> Vec<i64> {
    members
        .members()
        .iter()
        .filter_map(|m| m.child_id.as_i64())
        .collect()
}
