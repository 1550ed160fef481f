//! Relationship membership reconciliation
//!
//! Resources that manage a *relationship* between two remote objects (status pages
//! attached to a maintenance window, tags attached to a monitor) are reconciled
//! differently from ordinary records: the desired state is a set of foreign-key
//! references, while the remote API only offers whole-collection replace.
//!
//! This crate provides:
//!
//! - **Membership Model** (`model`): `MembershipSet`, `Member`, tri-state attributes,
//!   order-aware equality and the pure `diff` function
//! - **Gateway contract** (`gateway`): the fetch/replace pair every relation binds to
//! - **Reconciler** (`reconciler`): converges remote state with the fewest gateway
//!   calls, with a single retry on concurrent modification
//! - **Call context** (`context`): cancellation and deadlines for in-flight calls
//!
//! # Example
//!
//! ```no_run
//! use membership::{CallContext, Member, Reconciler};
//! # use membership::MembershipGateway;
//!
//! # async fn example<G: MembershipGateway<Parent = i64>>(gateway: G) -> Result<(), Box<dyn std::error::Error>> {
//! let reconciler = Reconciler::new("kuma_maintenance_status_pages", gateway);
//! let ctx = CallContext::new();
//!
//! let outcome = reconciler
//!     .apply_members(&ctx, &7, vec![Member::new(1), Member::new(2)], false)
//!     .await?;
//! assert_eq!(outcome.observed.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod gateway;
pub mod model;
pub mod reconciler;
#[cfg(test)]
mod reconciler_test;

pub use context::{CallContext, Interrupted};
pub use error::{GatewayError, MembershipError, Operation, ReconcileError};
pub use gateway::MembershipGateway;
pub use model::{AttrValue, Attributes, ChildId, Member, MembershipDiff, MembershipSet, diff};
pub use reconciler::{ApplyOutcome, ClearOutcome, Reconciler};
