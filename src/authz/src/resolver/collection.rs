//! Satisfaction over a set of held roles

use super::tracker::CycleError;
use super::Resolver;
use crate::config::CyclePolicy;
use crate::role::{RoleKind, RoleValue};
use tracing::{debug, warn};

impl<K: RoleKind> Resolver<K> {
    /// Whether any held role satisfies `required`
    ///
    /// Held roles are checked in order, each with a fresh
    /// [`CycleTracker`](super::CycleTracker), stopping at the first success.
    /// An empty collection never satisfies.
    ///
    /// A [`CycleError`] raised by one held role is handled per
    /// [`CyclePolicy`]: `SkipCandidate` treats that role as not satisfying and
    /// moves on, `AbortAll` returns the error.
    pub fn any_satisfies<'a, I>(&self, held: I, required: &RoleValue<K>) -> Result<bool, CycleError>
    where
        I: IntoIterator<Item = &'a RoleValue<K>>,
        K: 'a,
    {
        for (position, candidate) in held.into_iter().enumerate() {
            match self.satisfies(required, candidate) {
                Ok(true) => {
                    debug!(required = %required, candidate = %candidate, position, "Held role satisfies");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(error) => match self.config.cycle_policy {
                    CyclePolicy::SkipCandidate => {
                        warn!(
                            required = %required,
                            candidate = %candidate,
                            position,
                            %error,
                            "Skipping held role with cyclic conversions"
                        );
                    }
                    CyclePolicy::AbortAll => return Err(error),
                },
            }
        }

        Ok(false)
    }
}

/// Collection-side entry point: `held.satisfies(&resolver, &required)`
pub trait HeldRoles<K: RoleKind> {
    /// Whether any role in the collection satisfies `required`
    fn satisfies(&self, resolver: &Resolver<K>, required: &RoleValue<K>) -> Result<bool, CycleError>;
}

impl<K: RoleKind> HeldRoles<K> for [RoleValue<K>] {
    fn satisfies(&self, resolver: &Resolver<K>, required: &RoleValue<K>) -> Result<bool, CycleError> {
        resolver.any_satisfies(self, required)
    }
}
