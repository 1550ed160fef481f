//! Provider configuration
//!
//! Read once at startup from environment variables.

use crate::error::ProviderError;
use relation_schemas::RESOURCE_TYPES;
use std::collections::BTreeSet;
use std::env;
use std::time::Duration;

const DEFAULT_KUMA_URL: &str = "http://uptime-kuma:3001";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the relation provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kuma_url: String,
    pub api_token: String,
    /// HTTP client timeout
    pub timeout: Duration,
    /// Deadline for one lifecycle call, if any
    pub call_deadline: Option<Duration>,
    /// Resource types whose member order is part of equality
    pub ordered_relations: BTreeSet<String>,
}

impl ProviderConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kuma_url = lookup("KUMA_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_KUMA_URL.to_string());
        let api_token = lookup("KUMA_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidConfig(
                    "KUMA_API_TOKEN environment variable is required".to_string(),
                )
            })?;

        let timeout = match lookup("KUMA_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_secs("KUMA_TIMEOUT_SECS", &raw)?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let call_deadline = lookup("KUMA_CALL_DEADLINE_SECS")
            .map(|raw| parse_secs("KUMA_CALL_DEADLINE_SECS", &raw).map(Duration::from_secs))
            .transpose()?;

        let mut ordered_relations = BTreeSet::new();
        if let Some(raw) = lookup("KUMA_ORDERED_RELATIONS") {
            for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
                if !RESOURCE_TYPES.contains(&name) {
                    return Err(ProviderError::InvalidConfig(format!(
                        "KUMA_ORDERED_RELATIONS names unknown resource type '{}'",
                        name
                    )));
                }
                ordered_relations.insert(name.to_string());
            }
        }

        Ok(Self {
            kuma_url,
            api_token,
            timeout,
            call_deadline,
            ordered_relations,
        })
    }

    /// Whether member order is significant for the given resource type
    pub fn is_ordered(&self, resource_type: &str) -> bool {
        self.ordered_relations.contains(resource_type)
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<u64, ProviderError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ProviderError::InvalidConfig(format!(
            "{} must be a positive number of seconds, got '{}'",
            name, raw
        ))),
    }
}
