//! Tags of a monitor
//!
//! Each membership carries one optional attribute, `value`. The wire format
//! only has `null` and strings, so `Unset` travels as `null` and `Empty` as `""`.

use super::{gateway_error, observed_set};
use crate::adapter::RelationBinding;
use kuma_client::{KumaClientTrait, MonitorTag};
use membership::{AttrValue, GatewayError, Member, MembershipGateway, MembershipSet};
use relation_schemas::{MonitorTagsSpec, TagReference};
use std::sync::Arc;
use tracing::debug;

/// Attribute holding the tag value
pub const TAG_VALUE: &str = "value";

/// Binds `/api/monitors/{id}/tags` to the membership contract
pub struct MonitorTagsGateway {
    client: Arc<dyn KumaClientTrait>,
    order_significant: bool,
}

impl MonitorTagsGateway {
    pub fn new(client: Arc<dyn KumaClientTrait>, order_significant: bool) -> Self {
        Self {
            client,
            order_significant,
        }
    }
}

fn tag_member(tag_id: i64, value: Option<String>) -> Member {
    Member::new(tag_id).with_attribute(TAG_VALUE, AttrValue::from(value))
}

#[async_trait::async_trait]
impl MembershipGateway for MonitorTagsGateway {
    type Parent = i64;

    fn order_significant(&self) -> bool {
        self.order_significant
    }

    async fn fetch(&self, parent: &i64) -> Result<MembershipSet, GatewayError> {
        let tags = self
            .client
            .get_monitor_tags(*parent)
            .await
            .map_err(|e| gateway_error(*parent, e))?;
        debug!("Monitor {} has {} tags", parent, tags.len());
        observed_set(
            *parent,
            tags.into_iter()
                .map(|tag| tag_member(tag.tag_id, tag.value))
                .collect(),
            self.order_significant,
        )
    }

    async fn replace(&self, parent: &i64, members: &MembershipSet) -> Result<(), GatewayError> {
        let tags = members
            .members()
            .iter()
            .map(|m| {
                let tag_id = m.child_id.as_i64().ok_or_else(|| {
                    GatewayError::Remote(format!(
                        "monitor {}: tag id '{}' is not numeric",
                        parent, m.child_id
                    ))
                })?;
                Ok(MonitorTag {
                    tag_id,
                    value: m.attributes.get(TAG_VALUE).clone().into(),
                })
            })
            .collect::<Result<Vec<_>, GatewayError>>()?;

        self.client
            .set_monitor_tags(*parent, &tags)
            .await
            .map_err(|e| gateway_error(*parent, e))
    }
}

impl RelationBinding for MonitorTagsGateway {
    type Spec = MonitorTagsSpec;

    fn members(spec: &MonitorTagsSpec) -> Vec<Member> {
        spec.tags
            .iter()
            .map(|tag| tag_member(tag.tag_id(), tag.value().map(str::to_string)))
            .collect()
    }

    fn spec(parent: i64, observed: &MembershipSet) -> MonitorTagsSpec {
        let tags = observed
            .members()
            .iter()
            .filter_map(|m| {
                let tag_id = m.child_id.as_i64()?;
                Some(match m.attributes.get(TAG_VALUE) {
                    AttrValue::Unset => TagReference::Id(tag_id),
                    value => TagReference::with_value(tag_id, value.as_str().map(str::to_string)),
                })
            })
            .collect();

        MonitorTagsSpec {
            monitor_id: parent,
            tags,
        }
    }
}
