//! Provider
//!
//! Holds one `ResourceAdapter` per relation resource type and routes host
//! requests to the adapter for their `resource_type`.

use crate::adapter::{RelationBinding, ResourceAdapter};
use crate::config::ProviderConfig;
use crate::error::{Diagnostic, ProviderError};
use crate::gateways::{MaintenanceMonitorsGateway, MaintenanceStatusPagesGateway, MonitorTagsGateway};
use crate::protocol::{LifecycleOperation, Request, Response};
use kuma_client::KumaClientTrait;
use membership::CallContext;
use relation_schemas::{MaintenanceMonitorsSpec, MaintenanceStatusPagesSpec, MonitorTagsSpec, RelationSpec};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Relation provider for Uptime Kuma
pub struct Provider {
    status_pages: ResourceAdapter<MaintenanceStatusPagesGateway>,
    monitors: ResourceAdapter<MaintenanceMonitorsGateway>,
    tags: ResourceAdapter<MonitorTagsGateway>,
    call_deadline: Option<Duration>,
}

impl Provider {
    pub fn new(client: Arc<dyn KumaClientTrait>, config: &ProviderConfig) -> Self {
        Self {
            status_pages: ResourceAdapter::new(MaintenanceStatusPagesGateway::new(
                Arc::clone(&client),
                config.is_ordered(MaintenanceStatusPagesSpec::RESOURCE_TYPE),
            )),
            monitors: ResourceAdapter::new(MaintenanceMonitorsGateway::new(
                Arc::clone(&client),
                config.is_ordered(MaintenanceMonitorsSpec::RESOURCE_TYPE),
            )),
            tags: ResourceAdapter::new(MonitorTagsGateway::new(
                client,
                config.is_ordered(MonitorTagsSpec::RESOURCE_TYPE),
            )),
            call_deadline: config.call_deadline,
        }
    }

    /// Context for one lifecycle call, bounded by the configured deadline
    pub fn call_context(&self, cancel: CancellationToken) -> CallContext {
        let ctx = CallContext::with_token(cancel);
        match self.call_deadline {
            Some(deadline) => ctx.with_timeout(deadline),
            None => ctx,
        }
    }

    /// Run one host request to completion
    pub async fn handle(&self, ctx: &CallContext, request: &Request) -> Response {
        let resource_type = request.resource_type.as_str();
        if resource_type == MaintenanceStatusPagesSpec::RESOURCE_TYPE {
            run(&self.status_pages, ctx, request).await
        } else if resource_type == MaintenanceMonitorsSpec::RESOURCE_TYPE {
            run(&self.monitors, ctx, request).await
        } else if resource_type == MonitorTagsSpec::RESOURCE_TYPE {
            run(&self.tags, ctx, request).await
        } else {
            let e = ProviderError::UnknownResourceType(resource_type.to_string());
            error!("{}", e);
            Response::failed(request.state.clone(), &e)
        }
    }
}

async fn run<G: RelationBinding>(
    adapter: &ResourceAdapter<G>,
    ctx: &CallContext,
    request: &Request,
) -> Response {
    match execute(adapter, ctx, request).await {
        Ok(response) => response,
        Err(e) => {
            error!("{} {} failed: {}", adapter.resource_type(), request.operation, e);
            Response::failed(request.state.clone(), &e)
        }
    }
}

async fn execute<G: RelationBinding>(
    adapter: &ResourceAdapter<G>,
    ctx: &CallContext,
    request: &Request,
) -> Result<Response, ProviderError> {
    match request.operation {
        LifecycleOperation::Create => {
            let config: G::Spec = decode(request.config.as_ref(), "config")?;
            let state = adapter
                .create(ctx, &config, request.parent_known_empty)
                .await?;
            Ok(Response::applied(serde_json::to_value(state)?))
        }
        LifecycleOperation::Read => {
            let prior: G::Spec = decode(request.state.as_ref(), "state")?;
            match adapter.read(ctx, &prior).await? {
                Some(state) => Ok(Response::applied(serde_json::to_value(state)?)),
                None => {
                    warn!(
                        "{} parent {} is gone, dropping from state",
                        adapter.resource_type(),
                        prior.parent_id()
                    );
                    Ok(Response::removed().with_diagnostic(Diagnostic::warning(
                        "Relation removed",
                        format!(
                            "parent {} no longer exists; {} was removed with it",
                            prior.parent_id(),
                            adapter.resource_type()
                        ),
                    )))
                }
            }
        }
        LifecycleOperation::Update => {
            let config: G::Spec = decode(request.config.as_ref(), "config")?;
            let prior: Option<G::Spec> = request
                .state
                .as_ref()
                .map(|state| decode(Some(state), "state"))
                .transpose()?;
            let state = adapter.update(ctx, prior.as_ref(), &config).await?;
            Ok(Response::applied(serde_json::to_value(state)?))
        }
        LifecycleOperation::Delete => {
            let prior: G::Spec = decode(request.state.as_ref(), "state")?;
            adapter.delete(ctx, &prior).await?;
            Ok(Response::removed())
        }
        LifecycleOperation::Import => {
            let import_id = request.import_id.as_deref().ok_or_else(|| {
                ProviderError::InvalidRequest("import requires an import_id".to_string())
            })?;
            let state = adapter.import(ctx, import_id).await?;
            Ok(Response::applied(serde_json::to_value(state)?))
        }
    }
}

fn decode<T: DeserializeOwned>(value: Option<&Value>, field: &str) -> Result<T, ProviderError> {
    let value = value
        .filter(|v| !v.is_null())
        .ok_or_else(|| ProviderError::InvalidRequest(format!("missing {}", field)))?;
    serde_json::from_value(value.clone()).map_err(|e| ProviderError::InvalidConfig(format!("{}: {}", field, e)))
}
