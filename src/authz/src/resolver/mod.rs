//! Role resolver
//!
//! Decides whether a provided role satisfies a required role. Rules are tried
//! in a fixed order and the first success wins:
//!
//! 1. **Identity**: same kind, structurally equal payload
//! 2. **Unconditional pass**: provided kind is in the required kind's pass set
//! 3. **Attribute rules** of the required kind, in declaration order
//! 4. **Delegated predicates** of the required kind: guard keys first, then
//!    the predicate, invoked exactly once when every guard passes
//! 5. **Conversions** of the provided kind: the provided role re-expresses
//!    itself as another kind and resolution recurses
//!
//! Conversion chains are tracked by a [`CycleTracker`]; entering a kind twice
//! aborts the resolution with [`CycleError`].
//!
//! # Example
//!
//! ```rust
//! use rolecheck_authz::registry::{Registry, RoleDefinition};
//! use rolecheck_authz::resolver::Resolver;
//! use rolecheck_authz::role::{Payload, RoleValue};
//! use std::sync::Arc;
//!
//! rolecheck_authz::role_kinds! {
//!     pub enum Kind { TeamRoot, Root }
//! }
//!
//! let registry = Registry::build(vec![
//!     RoleDefinition::new(Kind::TeamRoot).conversion(Kind::Root, |_| Some(Payload::unit())),
//!     RoleDefinition::new(Kind::Root),
//! ])?;
//! let resolver = Resolver::new(Arc::new(registry));
//!
//! let resolution = resolver.resolve(&RoleValue::unit(Kind::Root), &RoleValue::unit(Kind::TeamRoot))?;
//! assert!(resolution.is_satisfied());
//! assert_eq!(resolution.conversion_path(), &[Kind::Root]);
//! # Ok::<(), rolecheck_authz::AuthzError>(())
//! ```

mod collection;
mod decision;
mod tracker;


pub use collection::HeldRoles;
pub use decision::{MatchedRule, Resolution};
pub use tracker::{CycleError, CycleTracker};

use crate::config::ResolverSection;
use crate::registry::Registry;
use crate::role::{RoleKind, RoleValue};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Resolves role satisfaction against an immutable [`Registry`]
///
/// # Thread Safety
///
/// The resolver holds no mutable state. Clone it or share it through `Arc`;
/// every call allocates its own [`CycleTracker`].
#[derive(Debug, Clone)]
pub struct Resolver<K: RoleKind> {
    registry: Arc<Registry<K>>,
    config: ResolverSection,
}

impl<K: RoleKind> Resolver<K> {
    /// Create a resolver with default settings
    pub fn new(registry: Arc<Registry<K>>) -> Self {
        Self::with_config(registry, ResolverSection::default())
    }

    /// Create a resolver with explicit settings
    pub fn with_config(registry: Arc<Registry<K>>, config: ResolverSection) -> Self {
        Self { registry, config }
    }

    /// The registry rules are read from
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// Resolver settings
    pub fn config(&self) -> &ResolverSection {
        &self.config
    }

    /// Whether `provided` satisfies `required`
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] if a conversion chain revisits a kind.
    pub fn satisfies(
        &self,
        required: &RoleValue<K>,
        provided: &RoleValue<K>,
    ) -> Result<bool, CycleError> {
        let mut tracker = CycleTracker::new();
        self.satisfies_with(required, provided, &mut tracker)
    }

    /// Whether `provided` satisfies `required`, recording conversions in `tracker`
    pub fn satisfies_with(
        &self,
        required: &RoleValue<K>,
        provided: &RoleValue<K>,
        tracker: &mut CycleTracker<K>,
    ) -> Result<bool, CycleError> {
        self.resolve_with(required, provided, tracker)
            .map(|resolution| resolution.is_satisfied())
    }

    /// Resolve and explain which rule granted satisfaction
    pub fn resolve(
        &self,
        required: &RoleValue<K>,
        provided: &RoleValue<K>,
    ) -> Result<Resolution<K>, CycleError> {
        let mut tracker = CycleTracker::new();
        self.resolve_with(required, provided, &mut tracker)
    }

    /// Resolve and explain, recording conversions in `tracker`
    pub fn resolve_with(
        &self,
        required: &RoleValue<K>,
        provided: &RoleValue<K>,
        tracker: &mut CycleTracker<K>,
    ) -> Result<Resolution<K>, CycleError> {
        let mut path = Vec::new();
        let resolution = match self.resolve_inner(required, provided, tracker, &mut path)? {
            Some(rule) => Resolution::granted(rule, path),
            None => Resolution::denied(),
        };

        if self.logs(required.kind()) || self.logs(provided.kind()) {
            info!(
                required = %required,
                provided = %provided,
                satisfied = resolution.is_satisfied(),
                rule = ?resolution.rule(),
                hops = resolution.hops(),
                "Role check"
            );
        } else {
            debug!(
                required = %required,
                provided = %provided,
                satisfied = resolution.is_satisfied(),
                "Role check"
            );
        }

        Ok(resolution)
    }

    /// Direct rules, then conversions of the provided side
    fn resolve_inner(
        &self,
        required: &RoleValue<K>,
        provided: &RoleValue<K>,
        tracker: &mut CycleTracker<K>,
        path: &mut Vec<K>,
    ) -> Result<Option<MatchedRule>, CycleError> {
        if let Some(rule) = self.match_direct(required, provided) {
            trace!(provided = %provided, %rule, "Direct rule matched");
            return Ok(Some(rule));
        }

        let definition = self.registry.lookup(provided.kind());
        if definition.conversions().is_empty() {
            return Ok(None);
        }

        tracker.enter(provided.kind())?;

        for rule in definition.conversions() {
            let payload = match rule.convert(provided.payload()) {
                Some(payload) => payload,
                None => {
                    trace!(
                        from = provided.kind().name(),
                        to = rule.target_kind.name(),
                        "Conversion not applicable"
                    );
                    continue;
                }
            };

            let converted = RoleValue::new(rule.target_kind, payload);
            trace!(from = %provided, to = %converted, "Converted provided role");

            path.push(rule.target_kind);
            if let Some(matched) = self.resolve_inner(required, &converted, tracker, path)? {
                return Ok(Some(matched));
            }
            path.pop();
        }

        Ok(None)
    }

    /// Identity, unconditional pass, attribute rules, delegated predicates
    fn match_direct(&self, required: &RoleValue<K>, provided: &RoleValue<K>) -> Option<MatchedRule> {
        if required == provided {
            return Some(MatchedRule::Identity);
        }

        let definition = self.registry.lookup(required.kind());

        if definition.passes_unconditionally(provided.kind()) {
            return Some(MatchedRule::UnconditionalPass);
        }

        for (index, rule) in definition.attribute_rules().iter().enumerate() {
            if rule.provided_kind == provided.kind()
                && rule.matches(provided.payload(), required.payload())
            {
                return Some(MatchedRule::AttributeRule { index });
            }
        }

        for (index, rule) in definition.delegated_predicates().iter().enumerate() {
            if rule.provided_kind != provided.kind() {
                continue;
            }
            if !rule.guards_pass(provided.payload(), required.payload()) {
                trace!(index, "Delegated predicate guard mismatch");
                continue;
            }
            if rule.evaluate(provided.payload(), required.payload()) {
                return Some(MatchedRule::DelegatedPredicate { index });
            }
        }

        None
    }

    /// Whether checks involving `kind` are logged at info level
    fn logs(&self, kind: K) -> bool {
        self.config.trace_all_kinds || self.registry.lookup(kind).logs()
    }
}
