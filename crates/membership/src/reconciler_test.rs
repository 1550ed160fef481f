//! Unit tests for the Reconciler
//!
//! A scripted gateway holds one parent's membership in memory, records every
//! call and can be primed to conflict, fail or hang.

#[cfg(test)]
mod tests {
    use crate::context::{CallContext, Interrupted};
    use crate::error::{GatewayError, MembershipError, Operation, ReconcileError};
    use crate::gateway::MembershipGateway;
    use crate::model::{ChildId, Member, MembershipSet};
    use crate::reconciler::{ClearOutcome, Reconciler};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fetch,
        Replace(Vec<ChildId>),
    }

    #[derive(Debug, Default)]
    struct Script {
        /// `None` means the parent does not exist
        members: Option<Vec<Member>>,
        calls: Vec<Call>,
        conflicts: u32,
        remote_failure: Option<String>,
        hang_replace: bool,
    }

    #[derive(Debug)]
    struct ScriptedGateway {
        order_significant: bool,
        script: Mutex<Script>,
    }

    impl ScriptedGateway {
        fn with_members(members: Vec<Member>) -> Self {
            Self {
                order_significant: false,
                script: Mutex::new(Script {
                    members: Some(members),
                    ..Default::default()
                }),
            }
        }

        fn without_parent() -> Self {
            Self {
                order_significant: false,
                script: Mutex::new(Script::default()),
            }
        }

        fn ordered(mut self) -> Self {
            self.order_significant = true;
            self
        }

        fn conflicts(self, count: u32) -> Self {
            self.script.lock().unwrap().conflicts = count;
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.script.lock().unwrap().calls.clone()
        }

        fn replace_calls(&self) -> Vec<Vec<ChildId>> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Replace(ids) => Some(ids),
                    Call::Fetch => None,
                })
                .collect()
        }

        fn members(&self) -> Option<Vec<Member>> {
            self.script.lock().unwrap().members.clone()
        }
    }

    #[async_trait::async_trait]
    impl MembershipGateway for ScriptedGateway {
        type Parent = i64;

        fn order_significant(&self) -> bool {
            self.order_significant
        }

        async fn fetch(&self, parent: &i64) -> Result<MembershipSet, GatewayError> {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call::Fetch);
            if let Some(message) = &script.remote_failure {
                return Err(GatewayError::Remote(message.clone()));
            }
            match &script.members {
                Some(members) => Ok(MembershipSet::new(members.clone(), self.order_significant).unwrap()),
                None => Err(GatewayError::ParentNotFound(parent.to_string())),
            }
        }

        async fn replace(&self, parent: &i64, members: &MembershipSet) -> Result<(), GatewayError> {
            let hang = {
                let mut script = self.script.lock().unwrap();
                script
                    .calls
                    .push(Call::Replace(members.child_ids().into_iter().cloned().collect()));
                if script.members.is_none() {
                    return Err(GatewayError::ParentNotFound(parent.to_string()));
                }
                if script.conflicts > 0 {
                    script.conflicts -= 1;
                    return Err(GatewayError::Conflict(parent.to_string()));
                }
                if let Some(message) = &script.remote_failure {
                    return Err(GatewayError::Remote(message.clone()));
                }
                script.hang_replace
            };
            if hang {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            self.script.lock().unwrap().members = Some(members.members().to_vec());
            Ok(())
        }
    }

    fn reconciler(gateway: ScriptedGateway) -> Reconciler<ScriptedGateway> {
        Reconciler::new("test_relation", gateway)
    }

    fn ids(values: &[&str]) -> Vec<ChildId> {
        values.iter().map(|v| ChildId::from(*v)).collect()
    }

    #[tokio::test]
    async fn test_apply_adds_to_empty_parent() {
        let r = reconciler(ScriptedGateway::with_members(vec![]));
        let outcome = r
            .apply_members(&CallContext::new(), &1, vec![Member::new("sp1")], false)
            .await
            .unwrap();

        assert!(outcome.replaced);
        assert_eq!(outcome.observed.child_ids(), vec![&ChildId::from("sp1")]);
        assert_eq!(r.gateway().replace_calls(), vec![ids(&["sp1"])]);
    }

    #[tokio::test]
    async fn test_apply_grows_then_shrinks_with_one_replace_each() {
        let r = reconciler(ScriptedGateway::with_members(vec![Member::new("sp1")]));
        let ctx = CallContext::new();

        r.apply_members(&ctx, &1, vec![Member::new("sp1"), Member::new("sp2")], false)
            .await
            .unwrap();
        r.apply_members(&ctx, &1, vec![Member::new("sp2")], false)
            .await
            .unwrap();

        assert_eq!(
            r.gateway().replace_calls(),
            vec![ids(&["sp1", "sp2"]), ids(&["sp2"])]
        );
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let r = reconciler(ScriptedGateway::with_members(vec![]));
        let ctx = CallContext::new();
        let desired = vec![Member::new("a"), Member::new("b")];

        let first = r.apply_members(&ctx, &1, desired.clone(), false).await.unwrap();
        let second = r.apply_members(&ctx, &1, desired, false).await.unwrap();

        assert!(first.replaced);
        assert!(!second.replaced);
        assert_eq!(r.gateway().replace_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_tolerates_reorder_when_not_order_significant() {
        let r = reconciler(ScriptedGateway::with_members(vec![Member::new("a"), Member::new("b")]));
        let outcome = r
            .apply_members(&CallContext::new(), &1, vec![Member::new("b"), Member::new("a")], false)
            .await
            .unwrap();

        assert!(!outcome.replaced);
        assert!(r.gateway().replace_calls().is_empty());
    }

    #[tokio::test]
    async fn test_apply_replaces_on_reorder_when_order_significant() {
        let r = reconciler(
            ScriptedGateway::with_members(vec![Member::new("a"), Member::new("b")]).ordered(),
        );
        let outcome = r
            .apply_members(&CallContext::new(), &1, vec![Member::new("b"), Member::new("a")], false)
            .await
            .unwrap();

        assert!(outcome.replaced);
        assert_eq!(r.gateway().replace_calls(), vec![ids(&["b", "a"])]);
    }

    #[tokio::test]
    async fn test_apply_empty_desired_clears_remote() {
        let r = reconciler(ScriptedGateway::with_members(vec![Member::new("a")]));
        let outcome = r
            .apply_members(&CallContext::new(), &1, vec![], false)
            .await
            .unwrap();

        assert!(outcome.replaced);
        assert!(outcome.observed.is_empty());
        assert_eq!(r.gateway().replace_calls(), vec![Vec::<ChildId>::new()]);
        assert_eq!(r.gateway().members(), Some(vec![]));
    }

    #[tokio::test]
    async fn test_apply_duplicate_members_rejected_without_gateway_call() {
        let r = reconciler(ScriptedGateway::with_members(vec![]));
        let err = r
            .apply_members(&CallContext::new(), &1, vec![Member::new(1), Member::new(1)], false)
            .await
            .unwrap_err();

        match err {
            ReconcileError::Configuration { parent, source } => {
                assert_eq!(parent, "1");
                assert_eq!(source, MembershipError::DuplicateMember { child_id: ChildId::Int(1) });
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
        assert!(r.gateway().calls().is_empty());
    }

    #[tokio::test]
    async fn test_apply_attribute_change_issues_full_replace() {
        let r = reconciler(ScriptedGateway::with_members(vec![Member::new("tag1")]));
        let desired = vec![Member::new("tag1").with_attribute("value", "v2")];
        let outcome = r
            .apply_members(&CallContext::new(), &1, desired.clone(), false)
            .await
            .unwrap();

        assert!(outcome.replaced);
        assert_eq!(r.gateway().members(), Some(desired));
    }

    #[tokio::test]
    async fn test_apply_known_empty_skips_first_fetch() {
        let r = reconciler(ScriptedGateway::with_members(vec![]));
        r.apply_members(&CallContext::new(), &1, vec![Member::new("a")], true)
            .await
            .unwrap();

        assert_eq!(r.gateway().calls(), vec![Call::Replace(ids(&["a"]))]);
    }

    #[tokio::test]
    async fn test_apply_retries_once_on_conflict() {
        let r = reconciler(ScriptedGateway::with_members(vec![]).conflicts(1));
        let outcome = r
            .apply_members(&CallContext::new(), &1, vec![Member::new("a")], false)
            .await
            .unwrap();

        assert_eq!(outcome.attempts, 2);
        assert_eq!(
            r.gateway().calls(),
            vec![
                Call::Fetch,
                Call::Replace(ids(&["a"])),
                Call::Fetch,
                Call::Replace(ids(&["a"])),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_second_conflict_is_fatal() {
        let r = reconciler(ScriptedGateway::with_members(vec![Member::new("x")]).conflicts(2));
        let err = r
            .apply_members(&CallContext::new(), &1, vec![Member::new("a")], false)
            .await
            .unwrap_err();

        match err {
            ReconcileError::Conflict { parent, desired, observed } => {
                assert_eq!(parent, "1");
                assert_eq!(desired.child_ids(), vec![&ChildId::from("a")]);
                assert_eq!(observed.child_ids(), vec![&ChildId::from("x")]);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(r.gateway().replace_calls().len(), 2);
        // Remote state is what was last observed
        assert_eq!(r.gateway().members(), Some(vec![Member::new("x")]));
    }

    #[tokio::test]
    async fn test_apply_remote_error_not_retried() {
        let gateway = ScriptedGateway::with_members(vec![]);
        gateway.script.lock().unwrap().remote_failure = Some("boom".to_string());
        let r = reconciler(gateway);

        let err = r
            .apply_members(&CallContext::new(), &1, vec![Member::new("a")], false)
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::Remote { operation: Operation::Fetch, .. }));
        assert_eq!(r.gateway().calls(), vec![Call::Fetch]);
    }

    #[tokio::test]
    async fn test_apply_missing_parent_is_error() {
        let r = reconciler(ScriptedGateway::without_parent());
        let err = r
            .apply_members(&CallContext::new(), &9, vec![Member::new("a")], false)
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::ParentNotFound { .. }));
        assert_eq!(err.parent(), "9");
    }

    #[tokio::test]
    async fn test_fetch_missing_parent_is_none() {
        let r = reconciler(ScriptedGateway::without_parent());
        assert!(r.fetch(&CallContext::new(), &1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_parent_exists_follows_fetch() {
        let ctx = CallContext::new();
        let present = reconciler(ScriptedGateway::with_members(vec![Member::new("a")]));
        assert!(present.parent_exists(&ctx, &1).await.unwrap());
        assert!(present.gateway().replace_calls().is_empty());

        let missing = reconciler(ScriptedGateway::without_parent());
        assert!(!missing.parent_exists(&ctx, &1).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_issues_empty_replace() {
        let r = reconciler(ScriptedGateway::with_members(vec![Member::new("a")]));
        let outcome = r.clear(&CallContext::new(), &1).await.unwrap();

        assert_eq!(outcome, ClearOutcome::Cleared);
        assert_eq!(r.gateway().calls(), vec![Call::Replace(vec![])]);
    }

    #[tokio::test]
    async fn test_clear_missing_parent_is_success() {
        let r = reconciler(ScriptedGateway::without_parent());
        let outcome = r.clear(&CallContext::new(), &1).await.unwrap();
        assert_eq!(outcome, ClearOutcome::AlreadyGone);
    }

    #[tokio::test]
    async fn test_clear_retries_conflict_once() {
        let r = reconciler(ScriptedGateway::with_members(vec![Member::new("a")]).conflicts(1));
        let outcome = r.clear(&CallContext::new(), &1).await.unwrap();

        assert_eq!(outcome, ClearOutcome::Cleared);
        assert_eq!(
            r.gateway().calls(),
            vec![Call::Replace(vec![]), Call::Fetch, Call::Replace(vec![])]
        );
    }

    #[tokio::test]
    async fn test_cancelled_context_makes_no_progress() {
        let r = reconciler(ScriptedGateway::with_members(vec![]));
        let ctx = CallContext::new();
        ctx.token().cancel();

        let err = r
            .apply_members(&ctx, &1, vec![Member::new("a")], false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Cancelled { operation: Operation::Fetch, reason: Interrupted::Cancelled, .. }
        ));
    }

    #[tokio::test]
    async fn test_deadline_during_replace_is_indeterminate() {
        let gateway = ScriptedGateway::with_members(vec![]);
        gateway.script.lock().unwrap().hang_replace = true;
        let r = reconciler(gateway);
        let ctx = CallContext::new().with_timeout(Duration::from_millis(20));

        let err = r
            .apply_members(&ctx, &1, vec![Member::new("a")], false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Indeterminate { reason: Interrupted::DeadlineExceeded, .. }
        ));
        assert_eq!(err.operation(), Some(Operation::Replace));
    }
}
