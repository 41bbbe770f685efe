//! Mixed-mark partial ancestral graph and possibly-d-separating traversals.
//!
//! Endpoint marks are stored per direction: `mark(a, b)` is the mark at the
//! `b` end of the a–b edge. A circle-circle edge is the unoriented default;
//! collider orientation rewrites the mark at the collider end to an arrow.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use causeway_core::Variable;

use crate::skeleton_graph::SkeletonGraph;

/// Mark at one end of a PAG edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Circle,
    Arrow,
    Tail,
}

/// Partial ancestral graph over variables.
#[derive(Debug, Clone, Default)]
pub struct Pag {
    /// `marks[a][b]` is the mark at the `b` end of the a–b edge. Both
    /// directions are always present for an existing edge.
    marks: BTreeMap<Variable, BTreeMap<Variable, Mark>>,
}

impl Pag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every edge of the skeleton becomes circle-circle.
    pub fn from_skeleton(skeleton: &SkeletonGraph) -> Self {
        let mut pag = Pag::new();
        for var in skeleton.nodes() {
            pag.marks.entry(var).or_default();
        }
        for (a, b) in skeleton.edges() {
            pag.insert_edge(&a, &b, Mark::Circle, Mark::Circle);
        }
        pag
    }

    pub fn nodes(&self) -> Vec<Variable> {
        self.marks.keys().cloned().collect()
    }

    pub fn neighbors(&self, var: &Variable) -> Vec<Variable> {
        self.marks
            .get(var)
            .map(|inner| inner.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_edge(&self, a: &Variable, b: &Variable) -> bool {
        self.marks
            .get(a)
            .is_some_and(|inner| inner.contains_key(b))
    }

    /// Mark at the `to` end of the from–to edge, if the edge exists.
    pub fn mark_at(&self, from: &Variable, to: &Variable) -> Option<Mark> {
        self.marks.get(from).and_then(|inner| inner.get(to)).copied()
    }

    /// Rewrite the mark at the `to` end of an existing edge to an arrow,
    /// leaving the `from` end untouched. Collider orientation primitive.
    pub fn orient_arrow(&mut self, from: &Variable, to: &Variable) {
        if let Some(mark) = self
            .marks
            .get_mut(from)
            .and_then(|inner| inner.get_mut(to))
        {
            *mark = Mark::Arrow;
        }
    }

    /// Insert a fully directed from→to edge (tail at `from`, arrow at `to`),
    /// overwriting any existing marks on the pair.
    pub fn add_directed_edge(&mut self, from: &Variable, to: &Variable) {
        self.insert_edge(from, to, Mark::Tail, Mark::Arrow);
    }

    /// Whether b is a collider on the a–b–c subpath (arrowheads at b from
    /// both sides).
    pub fn is_collider(&self, a: &Variable, b: &Variable, c: &Variable) -> bool {
        self.mark_at(a, b) == Some(Mark::Arrow) && self.mark_at(c, b) == Some(Mark::Arrow)
    }

    /// Possibly-d-separating set of `x` with respect to `y`.
    ///
    /// A node d belongs to pds(x, y) when some path x, …, d exists on which
    /// every internal triple (a, b, c) either has a collider at b or forms a
    /// triangle. The walk is a BFS over directed (prev, cur) pair states, so
    /// each traversal direction of each edge is expanded at most once;
    /// `max_path_length` bounds the number of edges on the path.
    pub fn pds(
        &self,
        x: &Variable,
        y: &Variable,
        max_path_length: Option<usize>,
    ) -> BTreeSet<Variable> {
        let mut result = BTreeSet::new();
        let mut visited: FxHashSet<(Variable, Variable)> = FxHashSet::default();
        let mut queue: VecDeque<(Variable, Variable, usize)> = VecDeque::new();

        for nbr in self.neighbors(x) {
            visited.insert((x.clone(), nbr.clone()));
            queue.push_back((x.clone(), nbr, 1));
        }

        while let Some((prev, cur, length)) = queue.pop_front() {
            if cur != *x && cur != *y {
                result.insert(cur.clone());
            }
            if max_path_length.is_some_and(|max| length >= max) {
                continue;
            }
            for next in self.neighbors(&cur) {
                if next == prev {
                    continue;
                }
                let key = (cur.clone(), next.clone());
                if visited.contains(&key) {
                    continue;
                }
                let collider = self.is_collider(&prev, &cur, &next);
                let triangle = self.has_edge(&prev, &next);
                if collider || triangle {
                    visited.insert(key);
                    queue.push_back((cur.clone(), next, length + 1));
                }
            }
        }
        result
    }

    /// pds(x, y) restricted to nodes that lie on some path from x toward y:
    /// the nodes sharing a biconnected component with the x–y edge (or, when
    /// the pair is not adjacent, with both endpoints).
    pub fn pds_path(
        &self,
        x: &Variable,
        y: &Variable,
        max_path_length: Option<usize>,
    ) -> BTreeSet<Variable> {
        let pds = self.pds(x, y, max_path_length);
        let components = self.biconnected_components();

        let mut on_path: BTreeSet<Variable> = BTreeSet::new();
        for component in &components {
            let retain = if self.has_edge(x, y) {
                component.contains(&(normalize(x, y)))
            } else {
                component_nodes(component).contains(x) && component_nodes(component).contains(y)
            };
            if retain {
                on_path.extend(component_nodes(component));
            }
        }
        pds.into_iter().filter(|d| on_path.contains(d)).collect()
    }

    /// Biconnected components of the underlying adjacency structure, each as
    /// a set of normalized edges. Hopcroft–Tarjan with an explicit stack.
    fn biconnected_components(&self) -> Vec<Vec<(Variable, Variable)>> {
        struct State {
            depth: BTreeMap<Variable, usize>,
            low: BTreeMap<Variable, usize>,
            edge_stack: Vec<(Variable, Variable)>,
            components: Vec<Vec<(Variable, Variable)>>,
        }

        fn visit(pag: &Pag, state: &mut State, u: &Variable, parent: Option<&Variable>, d: usize) {
            state.depth.insert(u.clone(), d);
            state.low.insert(u.clone(), d);
            for w in pag.neighbors(u) {
                if Some(&w) == parent {
                    continue;
                }
                if let Some(&wd) = state.depth.get(&w) {
                    // Back edge.
                    if wd < d {
                        state.edge_stack.push(normalize(u, &w));
                        let low_u = state.low[u].min(wd);
                        state.low.insert(u.clone(), low_u);
                    }
                } else {
                    state.edge_stack.push(normalize(u, &w));
                    visit(pag, state, &w, Some(u), d + 1);
                    let low_w = state.low[&w];
                    if low_w >= d {
                        // u is an articulation point; pop one component.
                        let mut component = Vec::new();
                        let marker = normalize(u, &w);
                        while let Some(edge) = state.edge_stack.pop() {
                            let done = edge == marker;
                            component.push(edge);
                            if done {
                                break;
                            }
                        }
                        state.components.push(component);
                    }
                    let low_u = state.low[u].min(low_w);
                    state.low.insert(u.clone(), low_u);
                }
            }
        }

        let mut state = State {
            depth: BTreeMap::new(),
            low: BTreeMap::new(),
            edge_stack: Vec::new(),
            components: Vec::new(),
        };
        for root in self.nodes() {
            if !state.depth.contains_key(&root) {
                visit(self, &mut state, &root, None, 0);
            }
        }
        state.components
    }

    fn insert_edge(&mut self, a: &Variable, b: &Variable, mark_at_a: Mark, mark_at_b: Mark) {
        self.marks
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), mark_at_b);
        self.marks
            .entry(b.clone())
            .or_default()
            .insert(a.clone(), mark_at_a);
    }
}

fn normalize(a: &Variable, b: &Variable) -> (Variable, Variable) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

fn component_nodes(component: &[(Variable, Variable)]) -> BTreeSet<Variable> {
    component
        .iter()
        .flat_map(|(a, b)| [a.clone(), b.clone()])
        .collect()
}
