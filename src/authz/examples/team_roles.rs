//! # Team roles demo
//!
//! Builds a small team hierarchy and runs a few checks against it.
//!
//! ```text
//! RUST_LOG=debug cargo run --example team_roles -- [config.toml]
//! ```
//!
//! The optional argument is a TOML configuration file (see [`Config`]).

use rolecheck_authz::{
    Config, HeldRoles, Payload, Registry, Resolver, RoleDefinition, RoleValue,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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

fn definitions() -> Vec<RoleDefinition<TeamRole>> {
    vec![
        RoleDefinition::new(TeamRole::UserRole).with_fields(["user_id"]),
        RoleDefinition::new(TeamRole::RoleAdmin)
            .without_fields()
            .predicate(TeamRole::UserRole, |_, _| true)
            .with_logging(true),
        RoleDefinition::new(TeamRole::TeamMember).with_fields(["team_id"]),
        RoleDefinition::new(TeamRole::KickMember).with_fields(["team_id", "member_id"]),
        RoleDefinition::new(TeamRole::TeamAdministrator)
            .with_fields(["team_id"])
            .attribute_rule("team_id", "team_id", TeamRole::TeamMember)
            .delegated(TeamRole::KickMember, [("team_id", "team_id")], |provided, _| {
                // Member 0 owns the team
                provided.get("member_id") != Some(&serde_json::json!(0))
            }),
        RoleDefinition::new(TeamRole::TeamRoot)
            .without_fields()
            .unconditional_pass(TeamRole::TeamAdministrator)
            .conversion(TeamRole::Root, |_| Some(Payload::unit())),
        RoleDefinition::new(TeamRole::Root)
            .without_fields()
            .conversion(TeamRole::TeamRoot, |_| Some(Payload::unit())),
    ]
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Rolecheck team roles demo v{}", rolecheck_authz::VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let registry = Arc::new(Registry::build_with_config(definitions(), config.registry)?);
    let resolver = Resolver::with_config(registry.clone(), config.resolver);

    let member = registry.role(TeamRole::TeamMember, Payload::new().with("team_id", 7))?;
    let administrator = registry.role(TeamRole::TeamAdministrator, Payload::new().with("team_id", 7))?;
    let other_team = registry.role(TeamRole::TeamAdministrator, Payload::new().with("team_id", 8))?;
    let kick = registry.role(
        TeamRole::KickMember,
        Payload::new().with("team_id", 7).with("member_id", 3),
    )?;
    let team_root = registry.unit_role(TeamRole::TeamRoot)?;
    let root = registry.unit_role(TeamRole::Root)?;
    let user = registry.role(TeamRole::UserRole, Payload::new().with("user_id", 1))?;
    let role_admin = registry.unit_role(TeamRole::RoleAdmin)?;

    let checks: [(&RoleValue<TeamRole>, &RoleValue<TeamRole>); 5] = [
        (&administrator, &member),
        (&other_team, &member),
        (&administrator, &kick),
        (&root, &team_root),
        (&role_admin, &user),
    ];

    for (required, provided) in checks {
        let resolution = resolver.resolve(required, provided)?;
        match resolution.rule() {
            Some(rule) => println!(
                "{} satisfies {} via {} ({} conversion hops)",
                provided,
                required,
                rule,
                resolution.hops()
            ),
            None => println!("{} does not satisfy {}", provided, required),
        }
    }

    // TeamRoot and Root convert into each other; checks that walk the loop
    // fail with a cycle error, which collection checks skip by default
    match resolver.satisfies(&member, &team_root) {
        Ok(satisfied) => println!("{} satisfies {}: {}", team_root, member, satisfied),
        Err(error) => println!("{}", error),
    }

    let held = vec![team_root.clone(), member.clone()];
    println!(
        "Held roles [{}, {}] satisfy {}: {}",
        team_root,
        member,
        administrator,
        held.satisfies(&resolver, &administrator)?
    );

    Ok(())
}
