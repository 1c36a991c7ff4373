//! Role values

use super::kind::RoleKind;
use super::payload::Payload;
use std::fmt;

/// An immutable instance of a role kind carrying its attributes
///
/// Equality is identity: same kind and structurally equal payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleValue<K: RoleKind> {
    kind: K,
    payload: Payload,
}

impl<K: RoleKind> RoleValue<K> {
    /// Create a role value without schema validation
    ///
    /// Use [`Registry::role`](crate::registry::Registry::role) to validate the
    /// payload against the kind's declared fields.
    pub fn new(kind: K, payload: Payload) -> Self {
        Self { kind, payload }
    }

    /// Create a role value of an attribute-less kind
    pub fn unit(kind: K) -> Self {
        Self::new(kind, Payload::unit())
    }

    /// The role kind
    pub fn kind(&self) -> K {
        self.kind
    }

    /// The role attributes
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Whether this value is of the given kind
    pub fn is_kind(&self, kind: K) -> bool {
        self.kind == kind
    }
}

impl<K: RoleKind> fmt::Display for RoleValue<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.name(), self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::role_kinds! {
        enum Kind {
            Member,
            Admin,
        }
    }

    #[test]
    fn test_identity_equality() {
        let a = RoleValue::new(Kind::Member, Payload::new().with("team_id", 7));
        let b = RoleValue::new(Kind::Member, Payload::new().with("team_id", 7));
        let c = RoleValue::new(Kind::Admin, Payload::new().with("team_id", 7));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unit_roles_are_equal() {
        assert_eq!(RoleValue::unit(Kind::Admin), RoleValue::unit(Kind::Admin));
        assert!(RoleValue::unit(Kind::Admin).is_kind(Kind::Admin));
    }

    #[test]
    fn test_display() {
        let role = RoleValue::new(Kind::Member, Payload::new().with("team_id", 7));
        assert_eq!(role.to_string(), "Member(team_id=7)");
    }
}
