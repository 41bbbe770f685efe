//! # causeway-graph
//!
//! Graph layer of the Causeway workspace:
//! - `SkeletonGraph`: the annotated undirected working graph pruned by the search
//! - `Pag`: mixed-mark partial ancestral graph with possibly-d-separating traversals
//! - `Dag`: ground-truth directed graph with d-separation, backing the oracles
//! - `Context`: the mutable state object threaded through a discovery run

pub mod context;
pub mod dag;
pub mod oracle;
pub mod pag;
pub mod skeleton_graph;

pub use context::{Context, ContextBuilder};
pub use dag::Dag;
pub use oracle::{OracleCd, OracleCi};
pub use pag::{Mark, Pag};
pub use skeleton_graph::{EdgeStats, SkeletonGraph};
