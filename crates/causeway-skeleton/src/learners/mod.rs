//! Learner workflows composing the skeleton engine.
//!
//! One engine, three orchestrations: a single Markovian pass, the two-stage
//! semi-Markovian workflow, and the interventional workflow over multiple
//! distributions.

mod interventional;
mod markovian;
mod semi_markovian;

pub use interventional::InterventionalLearner;
pub use markovian::SkeletonLearner;
pub use semi_markovian::SemiMarkovianLearner;

use causeway_core::{CausewayError, CausewayResult, SeparatingSets};
use causeway_graph::{Context, Mark, Pag, SkeletonGraph};

/// Output of a skeleton discovery run.
#[derive(Debug, Clone)]
pub struct SkeletonResult {
    /// The pruned working graph, with final edge annotations.
    pub graph: SkeletonGraph,
    /// Every separating set recorded along the way.
    pub sep_sets: SeparatingSets,
    /// The learner's private context after the run.
    pub context: Context,
    /// Completed engine passes.
    pub n_iters: usize,
}

/// A learner must start from a graph without annotations from a prior run.
pub(crate) fn guard_fresh_graph(ctx: &Context) -> CausewayResult<()> {
    if ctx.graph().has_annotations() {
        return Err(CausewayError::AnnotatedGraph);
    }
    Ok(())
}

/// Derive the intermediate PAG: every surviving skeleton edge becomes
/// circle-circle, then unshielded colliders are oriented. For every pair of
/// non-adjacent neighbors (vi, vj) of a common node u, u is a collider when
/// it appears in no recorded separating set of the pair.
pub fn collider_oriented_pag(skeleton: &SkeletonGraph, sep_sets: &SeparatingSets) -> Pag {
    let mut pag = Pag::from_skeleton(skeleton);
    for u in pag.nodes() {
        let nbrs = pag.neighbors(&u);
        for (i, vi) in nbrs.iter().enumerate() {
            for vj in nbrs.iter().skip(i + 1) {
                if pag.has_edge(vi, vj) {
                    continue;
                }
                if sep_sets.contains_in_any(&u, vi, vj) {
                    continue;
                }
                if pag.mark_at(vi, &u) == Some(Mark::Circle) {
                    pag.orient_arrow(vi, &u);
                }
                if pag.mark_at(vj, &u) == Some(Mark::Circle) {
                    pag.orient_arrow(vj, &u);
                }
            }
        }
    }
    pag
}
