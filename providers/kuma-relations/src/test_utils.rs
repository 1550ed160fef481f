//! Test utilities for unit testing adapters and the provider
//!
//! Everything here runs against `MockKumaClient`; no Uptime Kuma instance is needed.

use crate::adapter::ResourceAdapter;
use crate::config::ProviderConfig;
use crate::gateways::{MaintenanceMonitorsGateway, MaintenanceStatusPagesGateway, MonitorTagsGateway};
use crate::provider::Provider;
use kuma_client::{KumaClientTrait, MockKumaClient};
use relation_schemas::{MaintenanceMonitorsSpec, MaintenanceStatusPagesSpec, MonitorTagsSpec, TagReference};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Mock client with an empty store
pub fn mock_client() -> MockKumaClient {
    MockKumaClient::new("http://test-kuma")
}

/// Share a mock with a gateway; clones see the same store
pub fn shared(mock: &MockKumaClient) -> Arc<dyn KumaClientTrait> {
    Arc::new(mock.clone())
}

pub fn status_pages_adapter(
    mock: &MockKumaClient,
    ordered: bool,
) -> ResourceAdapter<MaintenanceStatusPagesGateway> {
    ResourceAdapter::new(MaintenanceStatusPagesGateway::new(shared(mock), ordered))
}

pub fn monitors_adapter(mock: &MockKumaClient) -> ResourceAdapter<MaintenanceMonitorsGateway> {
    ResourceAdapter::new(MaintenanceMonitorsGateway::new(shared(mock), false))
}

pub fn tags_adapter(mock: &MockKumaClient) -> ResourceAdapter<MonitorTagsGateway> {
    ResourceAdapter::new(MonitorTagsGateway::new(shared(mock), false))
}

/// Provider configuration that never touches the environment
pub fn test_config() -> ProviderConfig {
    ProviderConfig {
        kuma_url: "http://test-kuma".to_string(),
        api_token: "test-token".to_string(),
        timeout: Duration::from_secs(5),
        call_deadline: None,
        ordered_relations: BTreeSet::new(),
    }
}

pub fn test_provider(mock: &MockKumaClient) -> Provider {
    Provider::new(shared(mock), &test_config())
}

pub fn status_pages_spec(maintenance_id: i64, status_page_ids: &[i64]) -> MaintenanceStatusPagesSpec {
    MaintenanceStatusPagesSpec {
        maintenance_id,
        status_page_ids: status_page_ids.to_vec(),
    }
}

pub fn monitors_spec(maintenance_id: i64, monitor_ids: &[i64]) -> MaintenanceMonitorsSpec {
    MaintenanceMonitorsSpec {
        maintenance_id,
        monitor_ids: monitor_ids.to_vec(),
    }
}

pub fn tags_spec(monitor_id: i64, tags: Vec<TagReference>) -> MonitorTagsSpec {
    MonitorTagsSpec { monitor_id, tags }
}

/// Tag entry with an explicit value
pub fn tag(tag_id: i64, value: &str) -> TagReference {
    TagReference::with_value(tag_id, Some(value.to_string()))
}
