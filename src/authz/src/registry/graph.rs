//! Conversion graph between role kinds
//!
//! Each conversion rule is an edge `source -> target`. The graph is used at
//! registry build time to:
//! 1. Report conversion cycles (with the complete path)
//! 2. Answer reachability questions for diagnostics
//!
//! Conversion cycles are legal: whether a cycle is ever walked depends on the
//! payloads seen at resolution time, where the
//! [`CycleTracker`](crate::resolver::CycleTracker) stops it.

use super::types::RoleDefinition;
use crate::role::RoleKind;
use std::collections::VecDeque;

/// DFS node state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    Visiting,
    Done,
}

/// Directed graph of conversion edges, indexed by [`RoleKind::index`]
#[derive(Debug, Clone)]
pub struct ConversionGraph<K: RoleKind> {
    /// Outgoing edges per kind, in declaration order
    edges: Vec<Vec<K>>,
}

impl<K: RoleKind> ConversionGraph<K> {
    /// Build the graph from definitions ordered by kind index
    pub(crate) fn from_definitions(definitions: &[RoleDefinition<K>]) -> Self {
        let mut edges = vec![Vec::new(); K::count()];

        for definition in definitions {
            let targets = &mut edges[definition.kind().index()];
            for rule in definition.conversions() {
                if !targets.contains(&rule.target_kind) {
                    targets.push(rule.target_kind);
                }
            }
        }

        Self { edges }
    }

    /// Kinds `kind` converts into directly
    pub fn targets(&self, kind: K) -> &[K] {
        &self.edges[kind.index()]
    }

    /// Total number of distinct conversion edges
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Every kind reachable from `from` through one or more conversions
    ///
    /// Breadth-first, so kinds are listed in order of hop count.
    pub fn reachable(&self, from: K) -> Vec<K> {
        let mut seen = vec![false; self.edges.len()];
        let mut queue: VecDeque<K> = VecDeque::new();
        let mut reached = Vec::new();

        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for target in self.targets(current) {
                if !seen[target.index()] {
                    seen[target.index()] = true;
                    reached.push(*target);
                    queue.push_back(*target);
                }
            }
        }

        reached
    }

    /// Whether `to` can be reached from `from` through conversions
    pub fn can_reach(&self, from: K, to: K) -> bool {
        self.reachable(from).contains(&to)
    }

    /// Detect conversion cycles using DFS
    ///
    /// # Algorithm
    ///
    /// Depth-first search with three states:
    /// - Unvisited
    /// - Visiting (currently on the DFS stack)
    /// - Done (fully explored)
    ///
    /// Reaching a node that is still on the stack closes a cycle. Each cycle
    /// is reported once, starting and ending at the kind where it closed,
    /// e.g. `[Root, TeamRoot, Root]`.
    pub fn detect_cycles(&self) -> Vec<Vec<K>> {
        let mut state = vec![Visit::Unvisited; self.edges.len()];
        let mut cycles = Vec::new();

        for start in K::all() {
            if state[start.index()] == Visit::Unvisited {
                let mut path = Vec::new();
                self.dfs_cycle_detect(*start, &mut state, &mut path, &mut cycles);
            }
        }

        cycles
    }

    /// Recursive DFS for cycle detection
    fn dfs_cycle_detect(
        &self,
        node: K,
        state: &mut [Visit],
        path: &mut Vec<K>,
        cycles: &mut Vec<Vec<K>>,
    ) {
        match state[node.index()] {
            Visit::Visiting => {
                if let Some(cycle_start) = path.iter().position(|kind| *kind == node) {
                    let cycle: Vec<K> = path[cycle_start..]
                        .iter()
                        .copied()
                        .chain(std::iter::once(node))
                        .collect();
                    cycles.push(cycle);
                }
                return;
            }
            Visit::Done => return,
            Visit::Unvisited => {}
        }

        state[node.index()] = Visit::Visiting;
        path.push(node);

        for target in self.targets(node) {
            self.dfs_cycle_detect(*target, state, path, cycles);
        }

        state[node.index()] = Visit::Done;
        path.pop();
    }
}

/// Render a kind path as `A -> B -> A`
pub(crate) fn format_path<K: RoleKind>(path: &[K]) -> String {
    path.iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(" -> ")
}
