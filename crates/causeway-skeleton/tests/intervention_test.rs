//! Integration tests for the interventional learner: F-node bookkeeping,
//! cross-distribution testing, and separating-set augmentation.

use causeway_core::{CausewayError, Dataset, Variable};
use causeway_graph::{Context, Dag, OracleCd, OracleCi};
use causeway_skeleton::InterventionalLearner;

fn v(name: &str) -> Variable {
    Variable::column(name)
}

fn dataset(names: &[&str], rows: usize) -> Dataset {
    Dataset::from_columns(
        names
            .iter()
            .map(|name| (v(name), vec![0.0; rows]))
            .collect::<Vec<_>>(),
    )
    .unwrap()
}

/// Truth: x -> y, with one soft intervention on y. The F-node comparing the
/// two distributions points at y in the augmented graph.
fn intervened_collider_setup() -> (OracleCi, OracleCd, Context) {
    let f = Variable::f_node(0);

    let mut truth = Dag::new();
    truth.add_edge(&v("x"), &v("y")).unwrap();
    let ci = OracleCi::new(truth);

    let mut augmented = Dag::new();
    augmented.add_edge(&v("x"), &v("y")).unwrap();
    augmented.add_edge(&f, &v("y")).unwrap();
    let cd = OracleCd::new(augmented);

    let ctx = Context::builder()
        .complete_graph(&[v("x"), v("y"), f.clone()])
        .f_node(f, (0, 1))
        .num_distributions(2)
        .obs_distribution(true)
        .build()
        .unwrap();
    (ci, cd, ctx)
}

// =============================================================================
// Scenario C: the F-node keeps its edge to the intervened variable only
// =============================================================================
#[test]
fn f_node_retains_edge_to_shifted_mechanism() {
    let (ci, cd, ctx) = intervened_collider_setup();
    let data = vec![dataset(&["x", "y"], 8), dataset(&["x", "y"], 6)];

    let learner = InterventionalLearner::new(&ci, &cd);
    let result = learner.fit(&data, &ctx).unwrap();

    let f = Variable::f_node(0);
    assert!(result.graph.has_edge(&v("x"), &v("y")));
    assert!(result.graph.has_edge(&f, &v("y")));
    assert!(!result.graph.has_edge(&f, &v("x")));

    // The invariant pair was separated unconditionally.
    assert!(result.sep_sets.has_pair(&f, &v("x")));
}

// =============================================================================
// Dataset count must match the declared distribution count
// =============================================================================
#[test]
fn dataset_count_mismatch_is_fatal() {
    let (ci, cd, ctx) = intervened_collider_setup();
    let data = vec![dataset(&["x", "y"], 8)];

    let result = InterventionalLearner::new(&ci, &cd).fit(&data, &ctx);
    assert!(matches!(
        result,
        Err(CausewayError::DistributionMismatch {
            n_datasets: 1,
            n_distributions: 2,
        })
    ));
}

// =============================================================================
// Observational skeleton is staged on the output context
// =============================================================================
#[test]
fn observational_skeleton_is_preserved() {
    let (ci, cd, ctx) = intervened_collider_setup();
    let data = vec![dataset(&["x", "y"], 8), dataset(&["x", "y"], 6)];

    let result = InterventionalLearner::new(&ci, &cd).fit(&data, &ctx).unwrap();

    let obs = result.context.obs_skeleton().expect("staged by the learner");
    assert!(obs.has_edge(&v("x"), &v("y")));
    assert!(!obs.has_node(&Variable::f_node(0)));
}

// =============================================================================
// Recorded observational separating sets are augmented with all F-nodes
// =============================================================================
#[test]
fn separating_sets_gain_f_nodes() {
    // Truth: x and z independent given y (chain), one intervention on z.
    let f = Variable::f_node(0);

    let mut truth = Dag::new();
    truth.add_edge(&v("x"), &v("y")).unwrap();
    truth.add_edge(&v("y"), &v("z")).unwrap();
    let ci = OracleCi::new(truth);

    let mut augmented = Dag::new();
    augmented.add_edge(&v("x"), &v("y")).unwrap();
    augmented.add_edge(&v("y"), &v("z")).unwrap();
    augmented.add_edge(&f, &v("z")).unwrap();
    let cd = OracleCd::new(augmented);

    let ctx = Context::builder()
        .complete_graph(&[v("x"), v("y"), v("z"), f.clone()])
        .f_node(f.clone(), (0, 1))
        .num_distributions(2)
        .build()
        .unwrap();
    let data = vec![dataset(&["x", "y", "z"], 10), dataset(&["x", "y", "z"], 10)];

    let result = InterventionalLearner::new(&ci, &cd).fit(&data, &ctx).unwrap();

    // x ⫫ z | {y} was found observationally; the set now carries the F-node.
    assert!(result.sep_sets.contains_in_any(&v("y"), &v("x"), &v("z")));
    assert!(result.sep_sets.contains_in_any(&f, &v("x"), &v("z")));

    // The F-node edge toward the intervened z survives; x and y, whose
    // mechanisms are untouched, lose their F-node edges.
    assert!(result.graph.has_edge(&f, &v("z")));
    assert!(!result.graph.has_edge(&f, &v("x")));
    assert!(!result.graph.has_edge(&f, &v("y")));
}
