//! Role registry
//!
//! Maps every role kind to its [`RoleDefinition`]. The registry is built once,
//! validated eagerly, and is read-only afterwards, so it can be shared across
//! any number of concurrent resolutions through an `Arc` without locking.
//!
//! # Build-time validation
//!
//! [`RegistryBuilder::build`] rejects, in order:
//! - kinds whose [`RoleKind::index`] disagrees with [`RoleKind::all`]
//! - rules referencing a kind that has no definition (dangling references)
//! - kinds of the closed set that were never defined
//! - attribute rule and guard fields missing from a declared schema
//! - conversion cycles, when `reject_conversion_cycles` is configured
//!
//! # Example
//!
//! ```rust
//! use rolecheck_authz::registry::{Registry, RoleDefinition};
//! use rolecheck_authz::role::Payload;
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
//!
//! let member = registry.role(Kind::TeamMember, Payload::new().with("team_id", 7))?;
//! assert!(member.is_kind(Kind::TeamMember));
//! assert_eq!(registry.kind_count(), 2);
//! # Ok::<(), rolecheck_authz::AuthzError>(())
//! ```

mod graph;
mod types;


pub use graph::ConversionGraph;
pub use types::{
    AttributeRule, Conversion, ConversionRule, DelegatedPredicate, GuardKey, Predicate,
    RoleDefinition,
};

pub(crate) use graph::format_path;

use crate::config::RegistrySection;
use crate::error::{AuthzError, Result};
use crate::role::{Payload, RoleKind, RoleValue};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Registry construction errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A kind was defined twice
    #[error("Duplicate definition for role kind: {0}")]
    DuplicateDefinition(&'static str),

    /// `RoleKind::index` disagrees with the position in `RoleKind::all`
    #[error("Role kind {kind} reports index {reported} but is listed at position {expected}")]
    InconsistentKindIndex {
        kind: &'static str,
        reported: usize,
        expected: usize,
    },

    /// A kind is used but not listed in `RoleKind::all`
    #[error("Role kind {0} is not listed in the closed kind set")]
    UnlistedKind(&'static str),

    /// A rule references a kind that has no definition
    #[error("Role kind {owner} references undeclared role kind {referenced} in {rule}")]
    DanglingKind {
        owner: &'static str,
        rule: &'static str,
        referenced: &'static str,
    },

    /// A kind of the closed set has no definition
    #[error("No definition for role kind: {0}")]
    MissingDefinition(&'static str),

    /// A rule names a field the kind's schema does not declare
    #[error("Role kind {owner} references unknown field '{field}' of role kind {kind}")]
    UnknownField {
        owner: &'static str,
        kind: &'static str,
        field: String,
    },

    /// Conversion cycle rejected by configuration
    #[error("Conversion cycle detected: {0}")]
    ConversionCycle(String),
}

/// Collects role definitions and validates them into a [`Registry`]
#[derive(Debug, Clone)]
pub struct RegistryBuilder<K: RoleKind> {
    definitions: Vec<RoleDefinition<K>>,
    config: RegistrySection,
}

impl<K: RoleKind> RegistryBuilder<K> {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::with_config(RegistrySection::default())
    }

    /// Create a new builder with explicit settings
    pub fn with_config(config: RegistrySection) -> Self {
        Self {
            definitions: Vec::new(),
            config,
        }
    }

    /// Add a role definition
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDefinition`] if the kind is already defined.
    pub fn define(&mut self, definition: RoleDefinition<K>) -> std::result::Result<(), RegistryError> {
        if self.definitions.iter().any(|d| d.kind() == definition.kind()) {
            return Err(RegistryError::DuplicateDefinition(definition.kind().name()));
        }

        self.definitions.push(definition);
        Ok(())
    }

    /// Add several role definitions
    pub fn define_all<I>(&mut self, definitions: I) -> std::result::Result<(), RegistryError>
    where
        I: IntoIterator<Item = RoleDefinition<K>>,
    {
        for definition in definitions {
            self.define(definition)?;
        }
        Ok(())
    }

    /// Validate the definitions and build the registry
    pub fn build(self) -> std::result::Result<Registry<K>, RegistryError> {
        let count = K::count();

        for (position, kind) in K::all().iter().enumerate() {
            if kind.index() != position {
                return Err(RegistryError::InconsistentKindIndex {
                    kind: kind.name(),
                    reported: kind.index(),
                    expected: position,
                });
            }
        }

        // Place definitions at their kind index
        let mut slots: Vec<Option<RoleDefinition<K>>> = vec![None; count];
        for definition in self.definitions {
            let index = definition.kind().index();
            if index >= count {
                return Err(RegistryError::UnlistedKind(definition.kind().name()));
            }
            slots[index] = Some(definition);
        }

        // Dangling references
        for definition in slots.iter().flatten() {
            for (rule, referenced) in definition.references() {
                let defined = slots
                    .get(referenced.index())
                    .map_or(false, Option::is_some);
                if !defined {
                    return Err(RegistryError::DanglingKind {
                        owner: definition.kind().name(),
                        rule,
                        referenced: referenced.name(),
                    });
                }
            }
        }

        // Totality over the closed set
        if let Some(position) = slots.iter().position(Option::is_none) {
            return Err(RegistryError::MissingDefinition(K::all()[position].name()));
        }

        let definitions: Vec<RoleDefinition<K>> = slots.into_iter().flatten().collect();

        Self::validate_fields(&definitions)?;

        let graph = ConversionGraph::from_definitions(&definitions);
        let cycles = graph.detect_cycles();
        for cycle in &cycles {
            warn!(cycle = %format_path(cycle), "Conversion cycle in role registry");
        }
        if self.config.reject_conversion_cycles {
            if let Some(cycle) = cycles.first() {
                return Err(RegistryError::ConversionCycle(format_path(cycle)));
            }
        }

        info!(
            kinds = count,
            conversion_edges = graph.edge_count(),
            conversion_cycles = cycles.len(),
            "Role registry built"
        );

        Ok(Registry { definitions, graph })
    }

    /// Check attribute rule and guard fields against declared schemas
    fn validate_fields(definitions: &[RoleDefinition<K>]) -> std::result::Result<(), RegistryError> {
        let unknown = |owner: &RoleDefinition<K>, kind: K, field: &str| RegistryError::UnknownField {
            owner: owner.kind().name(),
            kind: kind.name(),
            field: field.to_string(),
        };

        for owner in definitions {
            let checks = owner
                .attribute_rules()
                .iter()
                .map(|rule| (rule.provided_kind, &rule.provided_field, &rule.required_field))
                .chain(owner.delegated_predicates().iter().flat_map(|rule| {
                    rule.guards
                        .iter()
                        .map(move |guard| (rule.provided_kind, &guard.provided_field, &guard.required_field))
                }));

            for (provided_kind, provided_field, required_field) in checks {
                if !owner.declares_field(required_field) {
                    return Err(unknown(owner, owner.kind(), required_field));
                }
                if !definitions[provided_kind.index()].declares_field(provided_field) {
                    return Err(unknown(owner, provided_kind, provided_field));
                }
            }
        }

        Ok(())
    }
}

impl<K: RoleKind> Default for RegistryBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable map from every role kind to its definition
#[derive(Debug)]
pub struct Registry<K: RoleKind> {
    /// Definitions ordered by kind index
    definitions: Vec<RoleDefinition<K>>,

    /// Conversion edges for diagnostics
    graph: ConversionGraph<K>,
}

impl<K: RoleKind> Registry<K> {
    /// Build a registry from definitions with default settings
    pub fn build<I>(definitions: I) -> std::result::Result<Self, RegistryError>
    where
        I: IntoIterator<Item = RoleDefinition<K>>,
    {
        Self::build_with_config(definitions, RegistrySection::default())
    }

    /// Build a registry from definitions with explicit settings
    pub fn build_with_config<I>(
        definitions: I,
        config: RegistrySection,
    ) -> std::result::Result<Self, RegistryError>
    where
        I: IntoIterator<Item = RoleDefinition<K>>,
    {
        let mut builder = RegistryBuilder::with_config(config);
        builder.define_all(definitions)?;
        builder.build()
    }

    /// Create a builder
    pub fn builder() -> RegistryBuilder<K> {
        RegistryBuilder::new()
    }

    /// Definition of `kind`
    ///
    /// Total: construction guarantees every kind of the closed set is defined.
    pub fn lookup(&self, kind: K) -> &RoleDefinition<K> {
        &self.definitions[kind.index()]
    }

    /// All definitions, ordered by kind index
    pub fn definitions(&self) -> &[RoleDefinition<K>] {
        &self.definitions
    }

    /// Number of role kinds
    pub fn kind_count(&self) -> usize {
        self.definitions.len()
    }

    /// Conversion graph between kinds
    pub fn conversion_graph(&self) -> &ConversionGraph<K> {
        &self.graph
    }

    /// Create a role value validated against the kind's declared schema
    ///
    /// Kinds without a declared schema accept any payload.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::InvalidInput`] if a declared field is missing or
    /// the payload carries an undeclared field.
    pub fn role(&self, kind: K, payload: Payload) -> Result<RoleValue<K>> {
        if let Some(schema) = self.lookup(kind).fields() {
            if let Some(missing) = schema.iter().find(|field| !payload.contains(field)) {
                return Err(AuthzError::InvalidInput(format!(
                    "Role {} is missing field '{}'",
                    kind.name(),
                    missing
                )));
            }
            if let Some(extra) = payload.fields().find(|field| !schema.contains(*field)) {
                return Err(AuthzError::InvalidInput(format!(
                    "Role {} has no field '{}'",
                    kind.name(),
                    extra
                )));
            }
        }

        debug!(kind = kind.name(), payload = %payload, "Constructed role value");
        Ok(RoleValue::new(kind, payload))
    }

    /// Create a unit role value
    pub fn unit_role(&self, kind: K) -> Result<RoleValue<K>> {
        self.role(kind, Payload::unit())
    }
}
