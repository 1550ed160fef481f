//! Membership and reconciliation errors

use crate::context::Interrupted;
use crate::model::{ChildId, MembershipSet};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Invalid membership declared by the caller. Detected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    /// The same child id was declared more than once
    #[error("duplicate member: child id {child_id} is declared more than once")]
    DuplicateMember { child_id: ChildId },
}

/// Errors returned by a membership gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The parent no longer exists remotely
    #[error("parent {0} not found")]
    ParentNotFound(String),

    /// The parent was modified concurrently and the replace was rejected
    #[error("parent {0} was modified concurrently")]
    Conflict(String),

    /// Transport or API failure
    #[error("remote error: {0}")]
    Remote(String),
}

/// Gateway call that was being attempted when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Fetch,
    Replace,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Fetch => write!(f, "fetch"),
            Operation::Replace => write!(f, "replace"),
        }
    }
}

/// Errors surfaced by the reconciler
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Declared membership is invalid; nothing was sent to the remote
    #[error("invalid configuration for parent {parent}: {source}")]
    Configuration {
        parent: String,
        #[source]
        source: MembershipError,
    },

    /// The parent does not exist remotely
    #[error("parent {parent} not found during {operation}")]
    ParentNotFound { parent: String, operation: Operation },

    /// Replace kept conflicting with a concurrent writer after the retry
    #[error("parent {parent} was modified concurrently twice; giving up after retry")]
    Conflict {
        parent: String,
        desired: MembershipSet,
        observed: MembershipSet,
    },

    /// Transport or API failure, not retried here
    #[error("{operation} on parent {parent} failed: {message}")]
    Remote {
        parent: String,
        operation: Operation,
        message: String,
    },

    /// A fetch was interrupted; nothing was changed
    #[error("{operation} on parent {parent} interrupted: {reason}")]
    Cancelled {
        parent: String,
        operation: Operation,
        reason: Interrupted,
    },

    /// A replace was interrupted; the remote may or may not have applied it
    #[error("replace on parent {parent} interrupted ({reason}); remote state is indeterminate")]
    Indeterminate { parent: String, reason: Interrupted },
}

impl ReconcileError {
    /// Identifier of the parent the failed operation targeted
    pub fn parent(&self) -> &str {
        match self {
            ReconcileError::Configuration { parent, .. }
            | ReconcileError::ParentNotFound { parent, .. }
            | ReconcileError::Conflict { parent, .. }
            | ReconcileError::Remote { parent, .. }
            | ReconcileError::Cancelled { parent, .. }
            | ReconcileError::Indeterminate { parent, .. } => parent,
        }
    }

    /// Gateway call in flight when the error occurred, if any
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ReconcileError::Configuration { .. } => None,
            ReconcileError::ParentNotFound { operation, .. }
            | ReconcileError::Remote { operation, .. }
            | ReconcileError::Cancelled { operation, .. } => Some(*operation),
            ReconcileError::Conflict { .. } | ReconcileError::Indeterminate { .. } => {
                Some(Operation::Replace)
            }
        }
    }
}
