use criterion::{black_box, criterion_group, criterion_main, Criterion};
use exact_td::elimination_order::{get_width, EliminationOrderDecomposer};
use exact_td::graph::{HashMapGraph, MutableGraph};
use exact_td::lowerbound::{LowerboundHeuristic, MinorMinWidth};
use exact_td::upperbound::{StochasticMinDegreeDecomposer, StochasticMinFillDecomposer};
use rand::prelude::*;

fn random_graph(n: usize, p: f64, seed: u64) -> HashMapGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = HashMapGraph::with_capacity(n);
    for u in 0..n {
        graph.add_vertex(u);
        for v in 0..u {
            if rng.gen_bool(p) {
                graph.add_edge(u, v);
            }
        }
    }
    graph
}

fn bounds(c: &mut Criterion) {
    let graph = random_graph(150, 0.05, 1);

    c.bench_function("stochastic_min_fill", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        b.iter(|| StochasticMinFillDecomposer::new(&graph).compute(&mut rng))
    });

    c.bench_function("stochastic_min_degree", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        b.iter(|| StochasticMinDegreeDecomposer::new(&graph).compute(&mut rng))
    });

    c.bench_function("minor_min_width", |b| {
        b.iter(|| MinorMinWidth::compute(black_box(&graph)))
    });
}

fn elimination(c: &mut Criterion) {
    let graph = random_graph(150, 0.05, 3);
    let mut rng = StdRng::seed_from_u64(4);
    let order = StochasticMinFillDecomposer::new(&graph)
        .runs(1)
        .compute(&mut rng)
        .permutation;

    c.bench_function("get_width", |b| {
        b.iter(|| get_width(&graph, black_box(&order)))
    });

    c.bench_function("elimination_order_decomposer", |b| {
        b.iter(|| EliminationOrderDecomposer::new(graph.clone(), order.clone()).compute())
    });
}

criterion_group!(benches, bounds, elimination);
criterion_main!(benches);
