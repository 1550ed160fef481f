//! Reconciler
//!
//! Converges a parent's remote membership to a desired set. Create and update
//! share one path: create is an update from an empty observed set.
//!
//! Every mutation is a single whole-collection `replace`; the pure `diff`
//! decides whether one is needed at all. A replace rejected as a concurrent
//! modification is retried once, end to end (fetch, diff, replace).

use crate::context::CallContext;
use crate::error::{GatewayError, Operation, ReconcileError};
use crate::gateway::MembershipGateway;
use crate::model::{Member, MembershipSet, diff};
use tracing::{debug, error, info, warn};

/// Fetch/diff/replace cycles allowed before a conflict becomes fatal
const MAX_ATTEMPTS: u32 = 2;

/// Result of converging a parent's membership
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// Membership after convergence
    pub observed: MembershipSet,
    /// Whether a replace was issued
    pub replaced: bool,
    /// Fetch/diff/replace cycles used (1 or 2)
    pub attempts: u32,
}

/// Result of removing every member of a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    /// The parent no longer exists, so neither do its memberships
    AlreadyGone,
}

/// Outcome of one guarded replace call
enum ReplaceFailure {
    Conflict,
    Fatal(ReconcileError),
}

/// Reconciles one relation type through its gateway
#[derive(Debug)]
pub struct Reconciler<G> {
    resource_type: String,
    gateway: G,
}

impl<G: MembershipGateway> Reconciler<G> {
    /// Creates a reconciler for `resource_type` backed by `gateway`.
    pub fn new(resource_type: impl Into<String>, gateway: G) -> Self {
        Self {
            resource_type: resource_type.into(),
            gateway,
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Whether this relation compares memberships as sequences
    pub fn order_significant(&self) -> bool {
        self.gateway.order_significant()
    }

    /// Validate declared members into a desired set for `parent`
    pub fn desired(
        &self,
        parent: &G::Parent,
        members: Vec<Member>,
    ) -> Result<MembershipSet, ReconcileError> {
        MembershipSet::new(members, self.order_significant()).map_err(|source| {
            error!("{} {}: {}", self.resource_type, parent, source);
            ReconcileError::Configuration {
                parent: parent.to_string(),
                source,
            }
        })
    }

    /// Whether `parent` exists remotely
    pub async fn parent_exists(
        &self,
        ctx: &CallContext,
        parent: &G::Parent,
    ) -> Result<bool, ReconcileError> {
        match ctx.guard(self.gateway.parent_exists(parent)).await {
            Ok(Ok(exists)) => Ok(exists),
            Ok(Err(e)) => Err(self.gateway_error(parent, Operation::Fetch, e)),
            Err(reason) => Err(ReconcileError::Cancelled {
                parent: parent.to_string(),
                operation: Operation::Fetch,
                reason,
            }),
        }
    }

    /// Read the current membership of `parent`
    ///
    /// Returns `Ok(None)` when the parent is gone: its memberships went with it,
    /// so there is nothing to reconcile.
    pub async fn fetch(
        &self,
        ctx: &CallContext,
        parent: &G::Parent,
    ) -> Result<Option<MembershipSet>, ReconcileError> {
        match self.fetch_required(ctx, parent).await {
            Ok(observed) => Ok(Some(observed)),
            Err(ReconcileError::ParentNotFound { .. }) => {
                warn!(
                    "{} parent {} no longer exists, treating relation as removed",
                    self.resource_type, parent
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Validate `members` and converge `parent` to them
    ///
    /// Invalid members are rejected before any gateway call.
    pub async fn apply_members(
        &self,
        ctx: &CallContext,
        parent: &G::Parent,
        members: Vec<Member>,
        known_empty: bool,
    ) -> Result<ApplyOutcome, ReconcileError> {
        let desired = self.desired(parent, members)?;
        self.apply(ctx, parent, &desired, known_empty).await
    }

    /// Converge `parent` to `desired`
    ///
    /// `known_empty` skips the first fetch when the caller knows the parent was
    /// just created with no members. An empty `desired` is a real target: it
    /// clears a non-empty remote membership.
    pub async fn apply(
        &self,
        ctx: &CallContext,
        parent: &G::Parent,
        desired: &MembershipSet,
        known_empty: bool,
    ) -> Result<ApplyOutcome, ReconcileError> {
        let mut skip_fetch = known_empty;
        let mut last_observed = MembershipSet::empty(desired.order_significant());

        for attempt in 1..=MAX_ATTEMPTS {
            let observed = if skip_fetch {
                debug!(
                    "{} parent {} known empty, skipping fetch",
                    self.resource_type, parent
                );
                MembershipSet::empty(desired.order_significant())
            } else {
                self.fetch_required(ctx, parent).await?
            };
            skip_fetch = false;

            let changes = diff(desired, &observed);
            if changes.is_empty() {
                debug!(
                    "{} parent {} already converged ({} members)",
                    self.resource_type,
                    parent,
                    observed.len()
                );
                return Ok(ApplyOutcome {
                    observed,
                    replaced: false,
                    attempts: attempt,
                });
            }

            info!(
                "{} parent {} needs changes {}, replacing with {} members (attempt {})",
                self.resource_type,
                parent,
                changes,
                desired.len(),
                attempt
            );
            match self.replace(ctx, parent, desired).await {
                Ok(()) => {
                    return Ok(ApplyOutcome {
                        observed: desired.clone(),
                        replaced: true,
                        attempts: attempt,
                    });
                }
                Err(ReplaceFailure::Conflict) => {
                    warn!(
                        "{} parent {} was modified concurrently (attempt {} of {})",
                        self.resource_type, parent, attempt, MAX_ATTEMPTS
                    );
                    last_observed = observed;
                }
                Err(ReplaceFailure::Fatal(e)) => return Err(e),
            }
        }

        error!(
            "{} parent {} still conflicting after retry, giving up",
            self.resource_type, parent
        );
        Err(ReconcileError::Conflict {
            parent: parent.to_string(),
            desired: desired.clone(),
            observed: last_observed,
        })
    }

    /// Remove every member of `parent`
    ///
    /// Always issues a replace with the empty set. A missing parent counts as
    /// success. A conflict is retried once after re-reading the membership.
    pub async fn clear(
        &self,
        ctx: &CallContext,
        parent: &G::Parent,
    ) -> Result<ClearOutcome, ReconcileError> {
        let empty = MembershipSet::empty(self.order_significant());
        let mut last_observed: Option<MembershipSet> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                match self.fetch(ctx, parent).await? {
                    Some(observed) => last_observed = Some(observed),
                    None => return Ok(ClearOutcome::AlreadyGone),
                }
            }

            info!(
                "{} parent {} clearing all members (attempt {})",
                self.resource_type, parent, attempt
            );
            match self.replace(ctx, parent, &empty).await {
                Ok(()) => return Ok(ClearOutcome::Cleared),
                Err(ReplaceFailure::Fatal(ReconcileError::ParentNotFound { .. })) => {
                    debug!("{} parent {} already gone", self.resource_type, parent);
                    return Ok(ClearOutcome::AlreadyGone);
                }
                Err(ReplaceFailure::Conflict) => {
                    warn!(
                        "{} parent {} was modified concurrently while clearing (attempt {} of {})",
                        self.resource_type, parent, attempt, MAX_ATTEMPTS
                    );
                }
                Err(ReplaceFailure::Fatal(e)) => return Err(e),
            }
        }

        Err(ReconcileError::Conflict {
            parent: parent.to_string(),
            desired: empty,
            observed: last_observed
                .unwrap_or_else(|| MembershipSet::empty(self.order_significant())),
        })
    }

    /// Fetch, treating a missing parent as an error
    async fn fetch_required(
        &self,
        ctx: &CallContext,
        parent: &G::Parent,
    ) -> Result<MembershipSet, ReconcileError> {
        match ctx.guard(self.gateway.fetch(parent)).await {
            Ok(Ok(observed)) => {
                debug!(
                    "{} parent {} has {} members",
                    self.resource_type,
                    parent,
                    observed.len()
                );
                Ok(observed)
            }
            Ok(Err(e)) => Err(self.gateway_error(parent, Operation::Fetch, e)),
            Err(reason) => {
                warn!(
                    "{} fetch of parent {} interrupted: {}",
                    self.resource_type, parent, reason
                );
                Err(ReconcileError::Cancelled {
                    parent: parent.to_string(),
                    operation: Operation::Fetch,
                    reason,
                })
            }
        }
    }

    async fn replace(
        &self,
        ctx: &CallContext,
        parent: &G::Parent,
        members: &MembershipSet,
    ) -> Result<(), ReplaceFailure> {
        match ctx.guard(self.gateway.replace(parent, members)).await {
            Ok(Ok(())) => {
                info!(
                    "{} parent {} now has {} members",
                    self.resource_type,
                    parent,
                    members.len()
                );
                Ok(())
            }
            Ok(Err(GatewayError::Conflict(_))) => Err(ReplaceFailure::Conflict),
            Ok(Err(e)) => Err(ReplaceFailure::Fatal(self.gateway_error(
                parent,
                Operation::Replace,
                e,
            ))),
            Err(reason) => {
                // The replace may or may not have landed; the next read decides
                error!(
                    "{} replace on parent {} interrupted: {}",
                    self.resource_type, parent, reason
                );
                Err(ReplaceFailure::Fatal(ReconcileError::Indeterminate {
                    parent: parent.to_string(),
                    reason,
                }))
            }
        }
    }

    fn gateway_error(
        &self,
        parent: &G::Parent,
        operation: Operation,
        e: GatewayError,
    ) -> ReconcileError {
        match e {
            GatewayError::ParentNotFound(_) => ReconcileError::ParentNotFound {
                parent: parent.to_string(),
                operation,
            },
            // Conflicts outside replace have no retry budget to spend
            GatewayError::Conflict(message) | GatewayError::Remote(message) => {
                error!(
                    "{} {} on parent {} failed: {}",
                    self.resource_type, operation, parent, message
                );
                ReconcileError::Remote {
                    parent: parent.to_string(),
                    operation,
                    message,
                }
            }
        }
    }
}
