//! Ground-truth directed acyclic graph with d-separation queries.
//!
//! Backs the graph oracles: d-separation in the true DAG decides what a
//! faithful statistical test would conclude.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rustc_hash::FxHashSet;

use causeway_core::{CausewayError, CausewayResult, Variable};

/// Directed acyclic graph over variables.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    children: BTreeMap<Variable, BTreeSet<Variable>>,
    parents: BTreeMap<Variable, BTreeSet<Variable>>,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, var: &Variable) {
        self.children.entry(var.clone()).or_default();
        self.parents.entry(var.clone()).or_default();
    }

    /// Insert from→to, rejecting edges that would close a cycle.
    pub fn add_edge(&mut self, from: &Variable, to: &Variable) -> CausewayResult<()> {
        if from == to || self.reaches(to, from) {
            return Err(CausewayError::GraphInconsistency {
                details: format!("edge {from} -> {to} would create a cycle"),
            });
        }
        self.add_node(from);
        self.add_node(to);
        self.children.get_mut(from).expect("node added").insert(to.clone());
        self.parents.get_mut(to).expect("node added").insert(from.clone());
        Ok(())
    }

    pub fn has_node(&self, var: &Variable) -> bool {
        self.children.contains_key(var)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Variable> {
        self.children.keys()
    }

    pub fn parents(&self, var: &Variable) -> impl Iterator<Item = &Variable> {
        self.parents.get(var).into_iter().flatten()
    }

    pub fn children(&self, var: &Variable) -> impl Iterator<Item = &Variable> {
        self.children.get(var).into_iter().flatten()
    }

    /// Whether the two variables are adjacent in either direction.
    pub fn adjacent(&self, a: &Variable, b: &Variable) -> bool {
        self.children.get(a).is_some_and(|c| c.contains(b))
            || self.children.get(b).is_some_and(|c| c.contains(a))
    }

    /// Whether `x` and `y` are d-separated given `z`.
    ///
    /// Active-trail reachability: walk (node, direction) states from `x`,
    /// where "up" states arrived from a child and "down" states from a
    /// parent; a collider passes the trail only when it is in or above `z`.
    pub fn d_separated(&self, x: &Variable, y: &Variable, z: &BTreeSet<Variable>) -> bool {
        if x == y {
            return false;
        }

        // Ancestors of z, including z itself.
        let mut above_z: FxHashSet<Variable> = z.iter().cloned().collect();
        let mut stack: Vec<Variable> = z.iter().cloned().collect();
        while let Some(node) = stack.pop() {
            for parent in self.parents(&node) {
                if above_z.insert(parent.clone()) {
                    stack.push(parent.clone());
                }
            }
        }

        const UP: bool = true;
        const DOWN: bool = false;
        let mut visited: FxHashSet<(Variable, bool)> = FxHashSet::default();
        let mut queue: VecDeque<(Variable, bool)> = VecDeque::new();
        queue.push_back((x.clone(), UP));

        while let Some((node, direction)) = queue.pop_front() {
            if !visited.insert((node.clone(), direction)) {
                continue;
            }
            if node == *y {
                return false;
            }
            if direction == UP && !z.contains(&node) {
                for parent in self.parents(&node) {
                    queue.push_back((parent.clone(), UP));
                }
                for child in self.children(&node) {
                    queue.push_back((child.clone(), DOWN));
                }
            } else if direction == DOWN {
                if !z.contains(&node) {
                    for child in self.children(&node) {
                        queue.push_back((child.clone(), DOWN));
                    }
                }
                if above_z.contains(&node) {
                    for parent in self.parents(&node) {
                        queue.push_back((parent.clone(), UP));
                    }
                }
            }
        }
        true
    }

    fn reaches(&self, from: &Variable, to: &Variable) -> bool {
        let mut seen: FxHashSet<&Variable> = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            for child in self.children(node) {
                if seen.insert(child) {
                    stack.push(child);
                }
            }
        }
        false
    }
}
