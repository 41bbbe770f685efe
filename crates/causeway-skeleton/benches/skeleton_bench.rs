use criterion::{criterion_group, criterion_main, Criterion};

use causeway_core::{Dataset, Variable};
use causeway_graph::{Context, Dag, OracleCi};
use causeway_skeleton::{ConditioningStrategy, SkeletonLearner};

fn v(index: usize) -> Variable {
    Variable::column(format!("n{index}"))
}

/// Layered DAG: 12 nodes, each wired to up to three forward neighbors.
fn build_layered_dag(n: usize) -> Dag {
    let mut dag = Dag::new();
    for i in 0..n {
        dag.add_node(&v(i));
    }
    for i in 0..n {
        for j in 1..=3 {
            let target = i + j;
            if target < n {
                dag.add_edge(&v(i), &v(target)).unwrap();
            }
        }
    }
    dag
}

fn bench_markovian_learner(c: &mut Criterion) {
    let n = 12;
    let oracle = OracleCi::new(build_layered_dag(n));
    let vars: Vec<Variable> = (0..n).map(v).collect();
    let ctx = Context::builder().complete_graph(&vars).build().unwrap();
    let data = Dataset::new();

    c.bench_function("markovian_skeleton_layered_12", |b| {
        b.iter(|| {
            let learner = SkeletonLearner::new(&oracle);
            learner.fit(&data, &ctx).unwrap()
        })
    });
}

fn bench_complete_strategy(c: &mut Criterion) {
    let n = 8;
    let oracle = OracleCi::new(build_layered_dag(n));
    let vars: Vec<Variable> = (0..n).map(v).collect();
    let ctx = Context::builder().complete_graph(&vars).build().unwrap();
    let data = Dataset::new();

    c.bench_function("complete_strategy_skeleton_8", |b| {
        b.iter(|| {
            let learner =
                SkeletonLearner::new(&oracle).with_strategy(ConditioningStrategy::Complete);
            learner.fit(&data, &ctx).unwrap()
        })
    });
}

criterion_group!(benches, bench_markovian_learner, bench_complete_strategy);
criterion_main!(benches);
