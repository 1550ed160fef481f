//! Uptime Kuma Relation Provider
//!
//! Manages relationships between Uptime Kuma objects as declarative resources:
//! - kuma_maintenance_status_pages: status pages that show a maintenance window
//! - kuma_maintenance_monitors: monitors covered by a maintenance window
//! - kuma_monitor_tags: tags (with optional values) attached to a monitor
//!
//! The host drives the provider over line-delimited JSON on stdin/stdout.

mod adapter;
mod config;
mod error;
mod gateways;
mod protocol;
mod provider;
#[cfg(test)]
mod test_utils;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::provider::Provider;
use kuma_client::KumaClient;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ProviderError> {
    // stdout carries the host protocol, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Uptime Kuma relation provider");

    let config = ProviderConfig::from_env()?;

    info!("Configuration:");
    info!("  Kuma URL: {}", config.kuma_url);
    info!("  HTTP timeout: {}s", config.timeout.as_secs());
    match config.call_deadline {
        Some(deadline) => info!("  Call deadline: {}s", deadline.as_secs()),
        None => info!("  Call deadline: none"),
    }
    if config.ordered_relations.is_empty() {
        info!("  Order-significant relations: none");
    } else {
        let ordered: Vec<&str> = config.ordered_relations.iter().map(String::as_str).collect();
        info!("  Order-significant relations: {}", ordered.join(", "));
    }

    let client = KumaClient::with_timeout(
        config.kuma_url.clone(),
        config.api_token.clone(),
        config.timeout,
    )?;
    client.validate_token().await?;
    info!("Connected to Uptime Kuma at {}", client.base_url());

    let provider = Provider::new(Arc::new(client), &config);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling in-flight calls");
            signal.cancel();
        }
    });

    protocol::serve(
        &provider,
        shutdown,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    info!("Uptime Kuma relation provider stopped");
    Ok(())
}
