//! # Rolecheck Authorization
//!
//! Capability role resolution: decide whether a *provided* role satisfies a
//! *required* role.
//!
//! ## Features
//!
//! - **Typed role kinds** from a closed set, declared with [`role_kinds!`]
//! - **Immutable registry** validated eagerly at build time
//! - **Ordered rules**: identity, unconditional pass, attribute rules,
//!   guarded delegated predicates, multi-hop conversions
//! - **Cycle-safe conversions** with a per-resolution [`CycleTracker`]
//! - **Collection checks** over the roles a caller holds
//! - **Structured logging** through `tracing`
//!
//! ## Example
//!
//! ```rust
//! use rolecheck_authz::{HeldRoles, Payload, Registry, Resolver, RoleDefinition, RoleValue};
//! use std::sync::Arc;
//!
//! rolecheck_authz::role_kinds! {
//!     pub enum Kind { TeamMember, TeamAdministrator }
//! }
//!
//! let registry = Registry::build(vec![
//!     RoleDefinition::new(Kind::TeamMember).with_fields(["team_id"]),
//!     RoleDefinition::new(Kind::TeamAdministrator)
//!         .with_fields(["team_id"])
//!         .attribute_rule("team_id", "team_id", Kind::TeamMember),
//! ])?;
//! let resolver = Resolver::new(Arc::new(registry));
//!
//! let required = RoleValue::new(Kind::TeamAdministrator, Payload::new().with("team_id", 7));
//! let held = vec![RoleValue::new(Kind::TeamMember, Payload::new().with("team_id", 7))];
//!
//! assert!(held.satisfies(&resolver, &required)?);
//! # Ok::<(), rolecheck_authz::AuthzError>(())
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod role;

// Re-export commonly used types
pub use config::{Config, CyclePolicy, RegistrySection, ResolverSection};
pub use error::{AuthzError, Result};
pub use registry::{GuardKey, Registry, RegistryBuilder, RegistryError, RoleDefinition};
pub use resolver::{CycleError, CycleTracker, HeldRoles, MatchedRule, Resolution, Resolver};
pub use role::{Payload, RoleKind, RoleValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
