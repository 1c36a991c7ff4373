//! Per-resolution cycle tracking

use crate::role::RoleKind;
use std::collections::HashSet;
use thiserror::Error;

/// A conversion chain revisited a role kind
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Role kind {} revisited along conversion chain {}", .kind, .chain.join(" -> "))]
pub struct CycleError {
    /// The kind entered twice
    pub kind: &'static str,

    /// Kinds entered so far, ending with the repeated one
    pub chain: Vec<&'static str>,
}

/// Kinds entered along the conversion chains of one resolution attempt
///
/// Visits are monotonic: once entered, a kind stays visited for the lifetime
/// of the tracker, across every conversion branch explored. Create one
/// tracker per top-level resolution and drop it afterwards.
#[derive(Debug, Clone)]
pub struct CycleTracker<K: RoleKind> {
    visited: HashSet<K>,

    /// Entry order, for error reporting
    chain: Vec<K>,

    /// Depth backstop: the number of distinct kinds
    limit: usize,
}

impl<K: RoleKind> CycleTracker<K> {
    /// Create an empty tracker
    pub fn new() -> Self {
        let limit = K::count();
        Self {
            visited: HashSet::with_capacity(limit),
            chain: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Record entry into `kind`
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] if `kind` was already entered.
    pub fn enter(&mut self, kind: K) -> Result<(), CycleError> {
        if !self.visited.insert(kind) {
            let chain = self
                .chain
                .iter()
                .map(|k| k.name())
                .chain(std::iter::once(kind.name()))
                .collect();
            return Err(CycleError {
                kind: kind.name(),
                chain,
            });
        }

        self.chain.push(kind);
        debug_assert!(
            self.chain.len() <= self.limit,
            "conversion depth exceeded the number of role kinds"
        );
        Ok(())
    }

    /// Whether `kind` was entered
    pub fn is_visited(&self, kind: K) -> bool {
        self.visited.contains(&kind)
    }

    /// Kinds entered, in order
    pub fn visited(&self) -> &[K] {
        &self.chain
    }

    /// Number of kinds entered
    pub fn depth(&self) -> usize {
        self.chain.len()
    }
}

impl<K: RoleKind> Default for CycleTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
