//! Remote Membership Gateway contract
//!
//! The reconciler depends only on this trait. Whole-collection replace is the
//! only mutation primitive: there is no incremental add or remove.

use crate::error::GatewayError;
use crate::model::MembershipSet;
use std::fmt;

/// Trait for relation fetch/replace operations against the remote service
///
/// Implementations bind one relation type (e.g. status pages of a maintenance
/// window) to the remote API. All async methods must be `Send` to work with
/// Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait MembershipGateway: Send + Sync {
    /// Identifier of the owning entity
    type Parent: fmt::Display + Clone + Send + Sync;

    /// Whether the remote relation preserves member order
    fn order_significant(&self) -> bool;

    /// Whether the parent exists remotely
    ///
    /// The default derives the answer from `fetch`; implementations with a
    /// cheaper existence check should override it.
    async fn parent_exists(&self, parent: &Self::Parent) -> Result<bool, GatewayError> {
        match self.fetch(parent).await {
            Ok(_) => Ok(true),
            Err(GatewayError::ParentNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Authoritative current members of `parent`
    ///
    /// Fails with `ParentNotFound` when the parent no longer exists.
    async fn fetch(&self, parent: &Self::Parent) -> Result<MembershipSet, GatewayError>;

    /// Atomically set the full membership of `parent` to exactly `members`
    ///
    /// Fails with `Conflict` when the parent was modified concurrently.
    async fn replace(&self, parent: &Self::Parent, members: &MembershipSet) -> Result<(), GatewayError>;
}
