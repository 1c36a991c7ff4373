//! Resolution outcomes

use crate::role::RoleKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule that granted satisfaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchedRule {
    /// Same kind and equal payload
    Identity,

    /// Provided kind is in the required kind's unconditional-pass set
    UnconditionalPass,

    /// Attribute rule at `index` in declaration order
    AttributeRule { index: usize },

    /// Delegated predicate at `index` in declaration order
    DelegatedPredicate { index: usize },
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::UnconditionalPass => write!(f, "unconditional pass"),
            Self::AttributeRule { index } => write!(f, "attribute rule #{}", index),
            Self::DelegatedPredicate { index } => write!(f, "delegated predicate #{}", index),
        }
    }
}

/// Outcome of resolving one (required, provided) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<K: RoleKind> {
    rule: Option<MatchedRule>,

    /// Kinds the provided role was converted into, in hop order
    conversion_path: Vec<K>,
}

impl<K: RoleKind> Resolution<K> {
    /// Satisfied by `rule` after converting through `conversion_path`
    pub fn granted(rule: MatchedRule, conversion_path: Vec<K>) -> Self {
        Self {
            rule: Some(rule),
            conversion_path,
        }
    }

    /// Not satisfied
    pub fn denied() -> Self {
        Self {
            rule: None,
            conversion_path: Vec::new(),
        }
    }

    /// Whether the provided role satisfies the required one
    pub fn is_satisfied(&self) -> bool {
        self.rule.is_some()
    }

    /// The rule that granted satisfaction
    pub fn rule(&self) -> Option<MatchedRule> {
        self.rule
    }

    /// Conversion targets walked before the rule matched
    pub fn conversion_path(&self) -> &[K] {
        &self.conversion_path
    }

    /// Number of conversion hops
    pub fn hops(&self) -> usize {
        self.conversion_path.len()
    }
}
