//! Status pages of a maintenance window

use super::{gateway_error, member_ids, numeric_ids, observed_set};
use crate::adapter::RelationBinding;
use kuma_client::KumaClientTrait;
use membership::{GatewayError, Member, MembershipGateway, MembershipSet};
use relation_schemas::MaintenanceStatusPagesSpec;
use std::sync::Arc;
use tracing::debug;

/// Binds `/api/maintenances/{id}/status-pages` to the membership contract
pub struct MaintenanceStatusPagesGateway {
    client: Arc<dyn KumaClientTrait>,
    order_significant: bool,
}

impl MaintenanceStatusPagesGateway {
    pub fn new(client: Arc<dyn KumaClientTrait>, order_significant: bool) -> Self {
        Self {
            client,
            order_significant,
        }
    }
}

#[async_trait::async_trait]
impl MembershipGateway for MaintenanceStatusPagesGateway {
    type Parent = i64;

    fn order_significant(&self) -> bool {
        self.order_significant
    }

    async fn fetch(&self, parent: &i64) -> Result<MembershipSet, GatewayError> {
        let ids = self
            .client
            .get_maintenance_status_pages(*parent)
            .await
            .map_err(|e| gateway_error(*parent, e))?;
        debug!("Maintenance {} shows on status pages {:?}", parent, ids);
        observed_set(
            *parent,
            ids.into_iter().map(Member::new).collect(),
            self.order_significant,
        )
    }

    async fn replace(&self, parent: &i64, members: &MembershipSet) -> Result<(), GatewayError> {
        let ids = member_ids(*parent, members)?;
        self.client
            .set_maintenance_status_pages(*parent, &ids)
            .await
            .map_err(|e| gateway_error(*parent, e))
    }
}

impl RelationBinding for MaintenanceStatusPagesGateway {
    type Spec = MaintenanceStatusPagesSpec;

    fn members(spec: &MaintenanceStatusPagesSpec) -> Vec<Member> {
        spec.status_page_ids.iter().copied().map(Member::new).collect()
    }

    fn spec(parent: i64, observed: &MembershipSet) -> MaintenanceStatusPagesSpec {
        MaintenanceStatusPagesSpec {
            maintenance_id: parent,
            status_page_ids: numeric_ids(observed),
        }
    }
}
