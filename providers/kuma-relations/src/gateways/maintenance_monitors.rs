//! Monitors of a maintenance window

use super::{gateway_error, member_ids, numeric_ids, observed_set};
use crate::adapter::RelationBinding;
use kuma_client::KumaClientTrait;
use membership::{GatewayError, Member, MembershipGateway, MembershipSet};
use relation_schemas::MaintenanceMonitorsSpec;
use std::sync::Arc;
use tracing::debug;

/// Binds `/api/maintenances/{id}/monitors` to the membership contract
pub struct MaintenanceMonitorsGateway {
    client: Arc<dyn KumaClientTrait>,
    order_significant: bool,
}

impl MaintenanceMonitorsGateway {
    pub fn new(client: Arc<dyn KumaClientTrait>, order_significant: bool) -> Self {
        Self {
            client,
            order_significant,
        }
    }
}

#[async_trait::async_trait]
impl MembershipGateway for MaintenanceMonitorsGateway {
    type Parent = i64;

    fn order_significant(&self) -> bool {
        self.order_significant
    }

    async fn fetch(&self, parent: &i64) -> Result<MembershipSet, GatewayError> {
        let ids = self
            .client
            .get_maintenance_monitors(*parent)
            .await
            .map_err(|e| gateway_error(*parent, e))?;
        debug!("Maintenance {} covers monitors {:?}", parent, ids);
        observed_set(
            *parent,
            ids.into_iter().map(Member::new).collect(),
            self.order_significant,
        )
    }

    async fn replace(&self, parent: &i64, members: &MembershipSet) -> Result<(), GatewayError> {
        let ids = member_ids(*parent, members)?;
        self.client
            .set_maintenance_monitors(*parent, &ids)
            .await
            .map_err(|e| gateway_error(*parent, e))
    }
}

impl RelationBinding for MaintenanceMonitorsGateway {
    type Spec = MaintenanceMonitorsSpec;

    fn members(spec: &MaintenanceMonitorsSpec) -> Vec<Member> {
        spec.monitor_ids.iter().copied().map(Member::new).collect()
    }

    fn spec(parent: i64, observed: &MembershipSet) -> MaintenanceMonitorsSpec {
        MaintenanceMonitorsSpec {
            maintenance_id: parent,
            monitor_ids: numeric_ids(observed),
        }
    }
}
