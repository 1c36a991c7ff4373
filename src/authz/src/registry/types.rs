//! Role definition types
//!
//! A [`RoleDefinition`] holds the resolution rules of one role kind. Rules are
//! kept in declaration order; the resolver tries them in that order and stops
//! at the first success.

use crate::role::{Payload, RoleKind};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Delegated predicate: `(provided payload, required payload) -> satisfied`
pub type Predicate = Arc<dyn Fn(&Payload, &Payload) -> bool + Send + Sync>;

/// Conversion function: re-express a payload as another kind, if eligible
pub type Conversion = Arc<dyn Fn(&Payload) -> Option<Payload> + Send + Sync>;

/// A provided role of `provided_kind` satisfies the owning role when
/// `provided[provided_field] == required[required_field]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRule<K: RoleKind> {
    /// Field read from the provided role
    pub provided_field: String,

    /// Field read from the required role
    pub required_field: String,

    /// Kind of provided role this rule applies to
    pub provided_kind: K,
}

impl<K: RoleKind> AttributeRule<K> {
    /// Whether the rule grants satisfaction for these payloads
    pub fn matches(&self, provided: &Payload, required: &Payload) -> bool {
        provided.field_matches(&self.provided_field, required, &self.required_field)
    }
}

/// Equality precondition gating a delegated predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardKey {
    /// Field read from the provided role
    pub provided_field: String,

    /// Field read from the required role
    pub required_field: String,
}

impl GuardKey {
    /// Create a guard key
    pub fn new(provided_field: impl Into<String>, required_field: impl Into<String>) -> Self {
        Self {
            provided_field: provided_field.into(),
            required_field: required_field.into(),
        }
    }
}

impl<P: Into<String>, R: Into<String>> From<(P, R)> for GuardKey {
    fn from((provided_field, required_field): (P, R)) -> Self {
        Self::new(provided_field, required_field)
    }
}

/// Caller-supplied predicate, optionally gated by guard keys
#[derive(Clone)]
pub struct DelegatedPredicate<K: RoleKind> {
    /// Kind of provided role this predicate applies to
    pub provided_kind: K,

    /// Guards checked before the predicate is invoked
    pub guards: Vec<GuardKey>,

    predicate: Predicate,
}

impl<K: RoleKind> DelegatedPredicate<K> {
    /// Whether every guard key compares equal
    pub fn guards_pass(&self, provided: &Payload, required: &Payload) -> bool {
        self.guards
            .iter()
            .all(|guard| provided.field_matches(&guard.provided_field, required, &guard.required_field))
    }

    /// Invoke the predicate
    pub fn evaluate(&self, provided: &Payload, required: &Payload) -> bool {
        (self.predicate)(provided, required)
    }
}

impl<K: RoleKind> fmt::Debug for DelegatedPredicate<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedPredicate")
            .field("provided_kind", &self.provided_kind)
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

/// Offer to re-express the owning role as `target_kind`
#[derive(Clone)]
pub struct ConversionRule<K: RoleKind> {
    /// Kind produced by the conversion
    pub target_kind: K,

    convert: Conversion,
}

impl<K: RoleKind> ConversionRule<K> {
    /// Run the conversion; `None` means this payload is not eligible
    pub fn convert(&self, payload: &Payload) -> Option<Payload> {
        (self.convert)(payload)
    }
}

impl<K: RoleKind> fmt::Debug for ConversionRule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRule")
            .field("target_kind", &self.target_kind)
            .finish_non_exhaustive()
    }
}

/// Resolution rules of one role kind
///
/// Built with chained methods, in the order the rules should be tried:
///
/// ```rust
/// use rolecheck_authz::registry::{GuardKey, RoleDefinition};
/// use rolecheck_authz::role::Payload;
///
/// rolecheck_authz::role_kinds! {
///     pub enum Kind { TeamMember, TeamAdministrator, TeamRoot, Root }
/// }
///
/// let admin = RoleDefinition::new(Kind::TeamAdministrator)
///     .with_fields(["team_id"])
///     .attribute_rule("team_id", "team_id", Kind::TeamMember);
///
/// let team_root = RoleDefinition::new(Kind::TeamRoot)
///     .without_fields()
///     .unconditional_pass(Kind::TeamAdministrator)
///     .conversion(Kind::Root, |_| Some(Payload::unit()));
///
/// assert_eq!(admin.attribute_rules().len(), 1);
/// assert!(team_root.passes_unconditionally(Kind::TeamAdministrator));
/// ```
#[derive(Debug, Clone)]
pub struct RoleDefinition<K: RoleKind> {
    kind: K,
    fields: Option<BTreeSet<String>>,
    unconditional_pass: Vec<K>,
    attribute_rules: Vec<AttributeRule<K>>,
    delegated_predicates: Vec<DelegatedPredicate<K>>,
    conversions: Vec<ConversionRule<K>>,
    log: bool,
}

impl<K: RoleKind> RoleDefinition<K> {
    /// Create a definition with no rules and no declared schema
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            fields: None,
            unconditional_pass: Vec::new(),
            attribute_rules: Vec::new(),
            delegated_predicates: Vec::new(),
            conversions: Vec::new(),
            log: false,
        }
    }

    /// Declare the payload fields of this kind
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Declare this kind as attribute-less (unit payload only)
    pub fn without_fields(mut self) -> Self {
        self.fields = Some(BTreeSet::new());
        self
    }

    /// Any provided role of `kind` satisfies this role
    pub fn unconditional_pass(mut self, kind: K) -> Self {
        if !self.unconditional_pass.contains(&kind) {
            self.unconditional_pass.push(kind);
        }
        self
    }

    /// Add an attribute-equality rule
    pub fn attribute_rule(
        mut self,
        provided_field: impl Into<String>,
        required_field: impl Into<String>,
        provided_kind: K,
    ) -> Self {
        self.attribute_rules.push(AttributeRule {
            provided_field: provided_field.into(),
            required_field: required_field.into(),
            provided_kind,
        });
        self
    }

    /// Add a delegated predicate gated by guard keys
    pub fn delegated<G, F>(mut self, provided_kind: K, guards: G, predicate: F) -> Self
    where
        G: IntoIterator,
        G::Item: Into<GuardKey>,
        F: Fn(&Payload, &Payload) -> bool + Send + Sync + 'static,
    {
        self.delegated_predicates.push(DelegatedPredicate {
            provided_kind,
            guards: guards.into_iter().map(Into::into).collect(),
            predicate: Arc::new(predicate),
        });
        self
    }

    /// Add a delegated predicate without guard keys
    pub fn predicate<F>(self, provided_kind: K, predicate: F) -> Self
    where
        F: Fn(&Payload, &Payload) -> bool + Send + Sync + 'static,
    {
        self.delegated(provided_kind, Vec::<GuardKey>::new(), predicate)
    }

    /// Add a conversion into `target_kind`
    pub fn conversion<F>(mut self, target_kind: K, convert: F) -> Self
    where
        F: Fn(&Payload) -> Option<Payload> + Send + Sync + 'static,
    {
        self.conversions.push(ConversionRule {
            target_kind,
            convert: Arc::new(convert),
        });
        self
    }

    /// Log checks involving this kind at info level
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log = enabled;
        self
    }

    /// The kind this definition belongs to
    pub fn kind(&self) -> K {
        self.kind
    }

    /// Declared payload fields, if a schema was declared
    pub fn fields(&self) -> Option<&BTreeSet<String>> {
        self.fields.as_ref()
    }

    /// Whether the schema declares `field` (always true without a schema)
    pub fn declares_field(&self, field: &str) -> bool {
        self.fields
            .as_ref()
            .map_or(true, |fields| fields.contains(field))
    }

    /// Kinds that always satisfy this role
    pub fn unconditional_passes(&self) -> &[K] {
        &self.unconditional_pass
    }

    /// Whether `kind` always satisfies this role
    pub fn passes_unconditionally(&self, kind: K) -> bool {
        self.unconditional_pass.contains(&kind)
    }

    /// Attribute rules in declaration order
    pub fn attribute_rules(&self) -> &[AttributeRule<K>] {
        &self.attribute_rules
    }

    /// Delegated predicates in declaration order
    pub fn delegated_predicates(&self) -> &[DelegatedPredicate<K>] {
        &self.delegated_predicates
    }

    /// Conversions in declaration order
    pub fn conversions(&self) -> &[ConversionRule<K>] {
        &self.conversions
    }

    /// Whether checks involving this kind are logged at info level
    pub fn logs(&self) -> bool {
        self.log
    }

    /// Every kind referenced by a rule, labelled with the rule type
    pub fn references(&self) -> impl Iterator<Item = (&'static str, K)> + '_ {
        self.unconditional_pass
            .iter()
            .map(|kind| ("unconditional pass", *kind))
            .chain(
                self.attribute_rules
                    .iter()
                    .map(|rule| ("attribute rule", rule.provided_kind)),
            )
            .chain(
                self.delegated_predicates
                    .iter()
                    .map(|rule| ("delegated predicate", rule.provided_kind)),
            )
            .chain(
                self.conversions
                    .iter()
                    .map(|rule| ("conversion", rule.target_kind)),
            )
    }
}
