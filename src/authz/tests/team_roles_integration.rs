//! Integration tests for team role resolution
//!
//! Covers a realistic team hierarchy, conversion cycles, collection checks
//! under both cycle policies, property-based rule checks and concurrent
//! resolution against a shared registry.

use proptest::prelude::*;
use rolecheck_authz::{
    AuthzError, CyclePolicy, HeldRoles, MatchedRule, Payload, Registry, Resolver, ResolverSection,
    RoleDefinition, RoleValue,
};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

rolecheck_authz::role_kinds! {
    pub enum TeamRole {
        UserRole,
        RoleAdmin,
        TeamMember,
        KickMember,
        TeamAdministrator,
        TeamRoot,
        Root,
    }
}

#[derive(Serialize)]
struct TeamMember {
    team_id: i64,
}

#[derive(Serialize)]
struct KickMember {
    team_id: i64,
    member_id: i64,
}

/// Team hierarchy. Root converts back into TeamRoot when `cyclic` is set.
fn team_definitions(cyclic: bool, kicks: Arc<AtomicUsize>) -> Vec<RoleDefinition<TeamRole>> {
    let root = RoleDefinition::new(TeamRole::Root).without_fields().with_logging(true);
    let root = if cyclic {
        root.conversion(TeamRole::TeamRoot, |_| Some(Payload::unit()))
    } else {
        root
    };

    vec![
        RoleDefinition::new(TeamRole::UserRole).with_fields(["user_id"]),
        RoleDefinition::new(TeamRole::RoleAdmin)
            .without_fields()
            .predicate(TeamRole::UserRole, |provided, _| provided.contains("user_id")),
        RoleDefinition::new(TeamRole::TeamMember).with_fields(["team_id"]),
        RoleDefinition::new(TeamRole::KickMember).with_fields(["team_id", "member_id"]),
        RoleDefinition::new(TeamRole::TeamAdministrator)
            .with_fields(["team_id"])
            .attribute_rule("team_id", "team_id", TeamRole::TeamMember)
            .delegated(TeamRole::KickMember, [("team_id", "team_id")], move |_, _| {
                kicks.fetch_add(1, Ordering::SeqCst);
                true
            }),
        RoleDefinition::new(TeamRole::TeamRoot)
            .without_fields()
            .unconditional_pass(TeamRole::TeamAdministrator)
            .conversion(TeamRole::Root, |_| Some(Payload::unit())),
        root,
    ]
}

fn resolver(cyclic: bool, policy: CyclePolicy) -> Resolver<TeamRole> {
    let registry = Registry::build(team_definitions(cyclic, Arc::default())).unwrap();
    let config = ResolverSection {
        cycle_policy: policy,
        ..ResolverSection::default()
    };
    Resolver::with_config(Arc::new(registry), config)
}

fn member(team_id: i64) -> RoleValue<TeamRole> {
    let payload = Payload::from_record(&TeamMember { team_id }).unwrap();
    RoleValue::new(TeamRole::TeamMember, payload)
}

fn admin(team_id: i64) -> RoleValue<TeamRole> {
    RoleValue::new(TeamRole::TeamAdministrator, Payload::new().with("team_id", team_id))
}

// ============================================================================
// TEAM HIERARCHY
// ============================================================================

#[test]
fn test_member_of_same_team_satisfies_administrator() {
    let resolver = resolver(false, CyclePolicy::SkipCandidate);

    assert!(resolver.satisfies(&admin(7), &member(7)).unwrap());
    assert!(!resolver.satisfies(&admin(7), &member(8)).unwrap());
}

#[test]
fn test_kick_permission_delegates_once() {
    let kicks = Arc::new(AtomicUsize::new(0));
    let registry = Registry::build(team_definitions(false, kicks.clone())).unwrap();
    let resolver = Resolver::new(Arc::new(registry));

    let kick = Payload::from_record(&KickMember { team_id: 7, member_id: 12 }).unwrap();
    let kick = RoleValue::new(TeamRole::KickMember, kick);

    let resolution = resolver.resolve(&admin(7), &kick).unwrap();
    assert_eq!(resolution.rule(), Some(MatchedRule::DelegatedPredicate { index: 0 }));
    assert_eq!(kicks.load(Ordering::SeqCst), 1);

    assert!(!resolver.satisfies(&admin(8), &kick).unwrap());
    assert_eq!(kicks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_role_admin_accepts_any_user() {
    let resolver = resolver(false, CyclePolicy::SkipCandidate);
    let user = RoleValue::new(TeamRole::UserRole, Payload::new().with("user_id", 42));

    assert!(resolver.satisfies(&RoleValue::unit(TeamRole::RoleAdmin), &user).unwrap());
}

#[test]
fn test_team_root_converts_to_root() {
    let resolver = resolver(false, CyclePolicy::SkipCandidate);

    let resolution = resolver
        .resolve(&RoleValue::unit(TeamRole::Root), &RoleValue::unit(TeamRole::TeamRoot))
        .unwrap();

    assert!(resolution.is_satisfied());
    assert_eq!(resolution.hops(), 1);
    assert_eq!(resolution.conversion_path(), &[TeamRole::Root]);
}

#[test]
fn test_administrator_passes_team_root() {
    let resolver = resolver(false, CyclePolicy::SkipCandidate);

    for team_id in [1, 7, 99] {
        let resolution = resolver
            .resolve(&RoleValue::unit(TeamRole::TeamRoot), &admin(team_id))
            .unwrap();
        assert_eq!(resolution.rule(), Some(MatchedRule::UnconditionalPass));
    }
}

#[test]
fn test_validated_roles_from_registry() {
    let registry = Registry::build(team_definitions(false, Arc::default())).unwrap();

    let member = registry
        .role(TeamRole::TeamMember, Payload::from_record(&TeamMember { team_id: 7 }).unwrap())
        .unwrap();
    assert_eq!(member.to_string(), "TeamMember(team_id=7)");

    let wrong = registry.role(TeamRole::KickMember, Payload::new().with("team_id", 7));
    assert!(matches!(wrong, Err(AuthzError::InvalidInput(_))));
}

// ============================================================================
// CONVERSION CYCLES
// ============================================================================

#[test]
fn test_cycle_reported_by_registry_graph() {
    let registry = Registry::build(team_definitions(true, Arc::default())).unwrap();
    let cycles = registry.conversion_graph().detect_cycles();

    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].contains(&TeamRole::Root));
    assert!(cycles[0].contains(&TeamRole::TeamRoot));
}

#[test]
fn test_cycle_error_on_unsatisfiable_check() {
    let resolver = resolver(true, CyclePolicy::SkipCandidate);

    let error = resolver
        .satisfies(&member(7), &RoleValue::unit(TeamRole::TeamRoot))
        .unwrap_err();

    assert_eq!(error.kind, "TeamRoot");
    assert_eq!(error.chain, vec!["TeamRoot", "Root", "TeamRoot"]);
}

#[test]
fn test_cycle_does_not_block_reachable_match() {
    let resolver = resolver(true, CyclePolicy::SkipCandidate);

    let result = resolver.satisfies(&RoleValue::unit(TeamRole::Root), &RoleValue::unit(TeamRole::TeamRoot));
    assert_eq!(result, Ok(true));
}

#[test]
fn test_collection_skips_cyclic_role() {
    let resolver = resolver(true, CyclePolicy::SkipCandidate);
    let held = vec![RoleValue::unit(TeamRole::TeamRoot), member(7)];

    assert!(held.satisfies(&resolver, &member(7)).unwrap());
    assert!(!held.satisfies(&resolver, &member(8)).unwrap());
}

#[test]
fn test_collection_aborts_on_cyclic_role() {
    let resolver = resolver(true, CyclePolicy::AbortAll);
    let held = vec![RoleValue::unit(TeamRole::TeamRoot), member(7)];

    let result: Result<bool, AuthzError> = held.satisfies(&resolver, &member(7)).map_err(Into::into);
    assert!(matches!(result, Err(AuthzError::Cycle(_))));
}

#[test]
fn test_collection_order_decides_abort() {
    let resolver = resolver(true, CyclePolicy::AbortAll);
    let held = vec![member(7), RoleValue::unit(TeamRole::TeamRoot)];

    assert_eq!(held.satisfies(&resolver, &member(7)), Ok(true));
}

// ============================================================================
// PROPERTY-BASED TESTS (PROPTEST)
// ============================================================================

proptest! {
    #[test]
    fn test_identity_always_satisfies(team_id in any::<i64>()) {
        let resolver = resolver(true, CyclePolicy::SkipCandidate);
        prop_assert!(resolver.satisfies(&member(team_id), &member(team_id)).unwrap());
    }

    #[test]
    fn test_unconditional_pass_ignores_team(team_id in any::<i64>()) {
        let resolver = resolver(false, CyclePolicy::SkipCandidate);
        let team_root = RoleValue::unit(TeamRole::TeamRoot);
        prop_assert!(resolver.satisfies(&team_root, &admin(team_id)).unwrap());
    }

    #[test]
    fn test_attribute_rule_matches_equal_teams(required in 0i64..1000, provided in 0i64..1000) {
        let resolver = resolver(false, CyclePolicy::SkipCandidate);
        let satisfied = resolver.satisfies(&admin(required), &member(provided)).unwrap();
        prop_assert_eq!(satisfied, required == provided);
    }

    #[test]
    fn test_skip_policy_never_errors(teams in prop::collection::vec(0i64..10, 0..8), required in 0i64..10) {
        let resolver = resolver(true, CyclePolicy::SkipCandidate);
        let mut held: Vec<_> = teams.iter().map(|team_id| member(*team_id)).collect();
        held.push(RoleValue::unit(TeamRole::TeamRoot));

        let satisfied = resolver.any_satisfies(&held, &member(required)).unwrap();
        prop_assert_eq!(satisfied, teams.contains(&required));
    }
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_shares_registry() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let kicks = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(Registry::build(team_definitions(true, kicks.clone())).unwrap());

    let mut join_set = JoinSet::new();

    for i in 0..100i64 {
        let resolver = Resolver::new(registry.clone());

        join_set.spawn(async move {
            let team_id = i % 10;
            let kick = RoleValue::new(
                TeamRole::KickMember,
                Payload::new().with("team_id", team_id).with("member_id", i),
            );
            let held = vec![RoleValue::unit(TeamRole::TeamRoot), member(team_id + 1), kick];
            held.satisfies(&resolver, &admin(team_id))
        });
    }

    let mut satisfied = 0;
    while let Some(result) = join_set.join_next().await {
        if result.unwrap().unwrap() {
            satisfied += 1;
        }
    }

    assert_eq!(satisfied, 100);
    assert_eq!(kicks.load(Ordering::SeqCst), 100);
}
