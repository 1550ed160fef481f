//! Provider-specific error types.
//!
//! `ProviderError` covers everything a lifecycle call can fail with. Failures
//! reach the host as `Diagnostic` values rather than as process errors.

use kuma_client::KumaError;
use membership::ReconcileError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the relation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Uptime Kuma API error outside of reconciliation (startup checks)
    #[error("Uptime Kuma error: {0}")]
    Kuma(#[from] KumaError),

    /// Reconciliation failed
    #[error("Reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Invalid provider or resource configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed host request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource type this provider does not serve
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// Import target does not exist
    #[error("Cannot import {resource_type}: parent {parent} not found")]
    ImportNotFound { resource_type: String, parent: String },

    /// Host channel I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem reported back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            parent: None,
            operation: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary, detail)
        }
    }
}

impl From<&ProviderError> for Diagnostic {
    fn from(error: &ProviderError) -> Self {
        match error {
            ProviderError::Reconcile(e) => Diagnostic::from(e),
            ProviderError::ImportNotFound { parent, .. } => Diagnostic {
                parent: Some(parent.clone()),
                ..Diagnostic::error("Cannot import relation", error.to_string())
            },
            ProviderError::InvalidConfig(_) => {
                Diagnostic::error("Invalid configuration", error.to_string())
            }
            ProviderError::InvalidRequest(_)
            | ProviderError::UnknownResourceType(_)
            | ProviderError::Serialization(_) => {
                Diagnostic::error("Invalid request", error.to_string())
            }
            ProviderError::Kuma(_) | ProviderError::Io(_) => {
                Diagnostic::error("Provider failure", error.to_string())
            }
        }
    }
}

impl From<&ReconcileError> for Diagnostic {
    fn from(error: &ReconcileError) -> Self {
        let (summary, detail) = match error {
            ReconcileError::Configuration { .. } => {
                ("Invalid configuration", error.to_string())
            }
            ReconcileError::ParentNotFound { .. } => ("Parent not found", error.to_string()),
            ReconcileError::Conflict {
                desired, observed, ..
            } => (
                "Concurrent modification",
                format!(
                    "{}\ndesired: {}\nlast observed: {}",
                    error,
                    serde_json::to_string(desired).unwrap_or_default(),
                    serde_json::to_string(observed).unwrap_or_default()
                ),
            ),
            ReconcileError::Remote { .. } => ("Uptime Kuma API error", error.to_string()),
            ReconcileError::Cancelled { .. } => ("Operation cancelled", error.to_string()),
            ReconcileError::Indeterminate { .. } => (
                "Remote state unknown",
                format!("{}; the next read is authoritative", error),
            ),
        };
        Diagnostic {
            parent: Some(error.parent().to_string()),
            operation: error.operation().map(|op| op.to_string()),
            ..Diagnostic::error(summary, detail)
        }
    }
}
