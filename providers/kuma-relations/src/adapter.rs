//! Resource Adapter
//!
//! Bridges the host's lifecycle verbs (create, read, update, delete, import)
//! to the membership reconciler. One adapter serves every relation resource
//! type; the per-type details live in a `RelationBinding`.
//!
//! Applied state has the same shape as declared configuration. When the
//! remote membership matches what was last applied, the prior state is
//! returned verbatim so that its entry forms and ordering survive a refresh.

use crate::error::ProviderError;
use membership::{CallContext, ClearOutcome, Member, MembershipGateway, MembershipSet, Reconciler};
use relation_schemas::RelationSpec;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, error, info, warn};

/// A gateway together with the declared configuration shape it serves
pub trait RelationBinding: MembershipGateway<Parent = i64> {
    /// Declared configuration (and applied state) shape
    type Spec: RelationSpec
        + Serialize
        + DeserializeOwned
        + Clone
        + PartialEq
        + fmt::Debug
        + Send
        + Sync;

    /// Desired members declared by a configuration
    fn members(spec: &Self::Spec) -> Vec<Member>;

    /// Render an observed membership as state
    fn spec(parent: i64, observed: &MembershipSet) -> Self::Spec;
}

/// Lifecycle operations for one relation resource type
#[derive(Debug)]
pub struct ResourceAdapter<G> {
    reconciler: Reconciler<G>,
}

impl<G: RelationBinding> ResourceAdapter<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            reconciler: Reconciler::new(<G::Spec as RelationSpec>::RESOURCE_TYPE, gateway),
        }
    }

    pub fn resource_type(&self) -> &str {
        self.reconciler.resource_type()
    }

    /// Apply a configuration for the first time.
    ///
    /// `parent_known_empty` lets the host skip the initial fetch when it has
    /// just created the parent itself.
    pub async fn create(
        &self,
        ctx: &CallContext,
        config: &G::Spec,
        parent_known_empty: bool,
    ) -> Result<G::Spec, ProviderError> {
        let parent = config.parent_id();
        info!("Creating {} for parent {}", self.resource_type(), parent);

        let outcome = self
            .reconciler
            .apply_members(ctx, &parent, G::members(config), parent_known_empty)
            .await?;
        Ok(self.render(parent, &outcome.observed, Some(config)))
    }

    /// Refresh state from the remote side.
    ///
    /// Returns `None` when the parent no longer exists; the host should drop
    /// the resource from its state.
    pub async fn read(
        &self,
        ctx: &CallContext,
        prior: &G::Spec,
    ) -> Result<Option<G::Spec>, ProviderError> {
        let parent = prior.parent_id();
        debug!("Reading {} for parent {}", self.resource_type(), parent);

        let Some(observed) = self.reconciler.fetch(ctx, &parent).await? else {
            return Ok(None);
        };
        let state = self.render(parent, &observed, Some(prior));
        if &state != prior {
            warn!(
                "{} for parent {} drifted from the applied state",
                self.resource_type(),
                parent
            );
        }
        Ok(Some(state))
    }

    /// Converge the remote side to a changed configuration.
    ///
    /// The parent id cannot change; the host must replace the resource
    /// instead. That is checked before any remote call.
    pub async fn update(
        &self,
        ctx: &CallContext,
        prior: Option<&G::Spec>,
        config: &G::Spec,
    ) -> Result<G::Spec, ProviderError> {
        let parent = config.parent_id();
        info!("Updating {} for parent {}", self.resource_type(), parent);

        if let Some(prior) = prior {
            let old_parent = prior.parent_id();
            if old_parent != parent {
                error!(
                    "{} parent changed from {} to {}, refusing in-place update",
                    self.resource_type(),
                    old_parent,
                    parent
                );
                return Err(ProviderError::InvalidConfig(format!(
                    "{} parent id is immutable ({} -> {}); the resource must be replaced",
                    self.resource_type(),
                    old_parent,
                    parent
                )));
            }
        }

        let outcome = self
            .reconciler
            .apply_members(ctx, &parent, G::members(config), false)
            .await?;
        Ok(self.render(parent, &outcome.observed, Some(config)))
    }

    /// Remove every membership of the parent.
    ///
    /// A parent that no longer exists counts as already deleted.
    pub async fn delete(&self, ctx: &CallContext, prior: &G::Spec) -> Result<(), ProviderError> {
        let parent = prior.parent_id();
        info!("Deleting {} for parent {}", self.resource_type(), parent);

        match self.reconciler.clear(ctx, &parent).await? {
            ClearOutcome::Cleared => {
                info!("Cleared {} for parent {}", self.resource_type(), parent);
            }
            ClearOutcome::AlreadyGone => {
                info!(
                    "Parent {} already gone, {} deleted with it",
                    parent,
                    self.resource_type()
                );
            }
        }
        Ok(())
    }

    /// Adopt the current remote membership of a parent verbatim.
    ///
    /// `import_id` is the parent id as a decimal string.
    pub async fn import(&self, ctx: &CallContext, import_id: &str) -> Result<G::Spec, ProviderError> {
        let parent: i64 = import_id.trim().parse().map_err(|_| {
            ProviderError::InvalidConfig(format!(
                "import id '{}' is not a numeric parent id",
                import_id
            ))
        })?;
        info!("Importing {} for parent {}", self.resource_type(), parent);

        let not_found = || ProviderError::ImportNotFound {
            resource_type: self.resource_type().to_string(),
            parent: parent.to_string(),
        };
        let observed = self.reconciler.fetch(ctx, &parent).await?.ok_or_else(not_found)?;

        info!(
            "Imported {} for parent {} with {} members",
            self.resource_type(),
            parent,
            observed.len()
        );
        Ok(G::spec(parent, &observed))
    }

    /// State for `observed`, preferring the prior form when nothing changed
    fn render(&self, parent: i64, observed: &MembershipSet, prior: Option<&G::Spec>) -> G::Spec {
        let prior_set = prior
            .filter(|p| p.parent_id() == parent)
            .and_then(|p| Some((p, MembershipSet::new(G::members(p), observed.order_significant()).ok()?)));

        match prior_set {
            Some((prior, prior_set)) if MembershipSet::equal(&prior_set, observed) => prior.clone(),
            Some((_, prior_set)) => G::spec(parent, &observed.aligned_to(&prior_set)),
            None => G::spec(parent, observed),
        }
    }
}
