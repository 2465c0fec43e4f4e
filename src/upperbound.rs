use crate::elimination_order::{
    get_width, EliminationOrderDecomposer, PermutationDecompositionResult,
};
use crate::graph::HashMapGraph;
use crate::heuristic_elimination_order::{
    HeuristicEliminationDecomposer, MinDegreeSelector, MinFillSelector, Selector,
};
use crate::progress::ProgressSink;
use crate::util::{Stopper, Timer};
use log::{debug, info};
use rand::prelude::*;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpperboundHeuristicType {
    MinFill,
    MinDegree,
    All,
}

impl Default for UpperboundHeuristicType {
    fn default() -> Self {
        UpperboundHeuristicType::MinFill
    }
}

impl UpperboundHeuristicType {
    /// Best decomposition found by `runs` randomized runs of the chosen heuristic(s).
    pub fn compute<R: Rng>(
        &self,
        graph: &HashMapGraph,
        runs: usize,
        rng: &mut R,
    ) -> PermutationDecompositionResult {
        match self {
            UpperboundHeuristicType::MinFill => StochasticMinFillDecomposer::new(graph)
                .runs(runs)
                .compute(rng),
            UpperboundHeuristicType::MinDegree => StochasticMinDegreeDecomposer::new(graph)
                .runs(runs)
                .compute(rng),
            UpperboundHeuristicType::All => {
                let min_fill = StochasticMinFillDecomposer::new(graph)
                    .runs(runs)
                    .compute(rng);
                let min_degree = StochasticMinDegreeDecomposer::new(graph)
                    .runs(runs)
                    .compute(rng);
                if min_degree.width() < min_fill.width() {
                    min_degree
                } else {
                    min_fill
                }
            }
        }
    }
}

pub type StochasticMinFillDecomposer<'a> = StochasticDecomposer<'a, MinFillSelector>;
pub type StochasticMinDegreeDecomposer<'a> = StochasticDecomposer<'a, MinDegreeSelector>;

/// Repeats a randomized greedy elimination and keeps the narrowest result.
pub struct StochasticDecomposer<'a, S: Selector> {
    graph: &'a HashMapGraph,
    runs: usize,
    lowerbound: usize,
    _selector: PhantomData<S>,
}

impl<'a, S: Selector> StochasticDecomposer<'a, S> {
    pub fn new(graph: &'a HashMapGraph) -> Self {
        Self {
            graph,
            runs: 5,
            lowerbound: 0,
            _selector: PhantomData,
        }
    }

    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Stops repeating as soon as a decomposition of this width is found.
    pub fn lowerbound(mut self, lowerbound: usize) -> Self {
        self.lowerbound = lowerbound;
        self
    }

    pub fn compute<R: Rng>(self, rng: &mut R) -> PermutationDecompositionResult {
        let mut best =
            HeuristicEliminationDecomposer::<S>::with_graph(self.graph).compute(rng);
        for run in 1..self.runs {
            if best.width() <= self.lowerbound as isize {
                break;
            }
            let current =
                HeuristicEliminationDecomposer::<S>::with_graph(self.graph).compute(rng);
            if current.width() < best.width() {
                debug!("run {} improved the upper bound to {}", run, current.width());
                best = current;
            }
        }
        best
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalSearchLimits {
    pub restarts: usize,
    pub steps: usize,
}

impl Default for LocalSearchLimits {
    fn default() -> Self {
        Self {
            restarts: 10,
            steps: 100,
        }
    }
}

/// Random restarts, each followed by a hill climb over random transpositions of the
/// elimination order. A swap is kept only if it strictly decreases the width.
pub struct SimpleLocalSearch<'a> {
    graph: &'a HashMapGraph,
    limits: LocalSearchLimits,
    timer: Timer,
    lowerbound: usize,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl<'a> SimpleLocalSearch<'a> {
    pub fn new(graph: &'a HashMapGraph, limits: LocalSearchLimits) -> Self {
        Self {
            graph,
            limits,
            timer: Timer::unlimited(),
            lowerbound: 0,
            progress: None,
        }
    }

    pub fn timer(mut self, timer: Timer) -> Self {
        self.timer = timer;
        self
    }

    pub fn lowerbound(mut self, lowerbound: usize) -> Self {
        self.lowerbound = lowerbound;
        self
    }

    pub fn progress(mut self, progress: Option<Arc<dyn ProgressSink>>) -> Self {
        self.progress = progress;
        self
    }

    pub fn run<R: Rng>(
        self,
        initial: Option<PermutationDecompositionResult>,
        rng: &mut R,
    ) -> PermutationDecompositionResult {
        let vertices = self.graph.sorted_vertices();
        if vertices.is_empty() {
            return initial.unwrap_or_else(|| {
                EliminationOrderDecomposer::new(self.graph.clone(), vec![]).compute()
            });
        }

        let (mut best_order, mut best_width) = match initial.as_ref() {
            Some(initial) => (
                initial.permutation.clone(),
                get_width(self.graph, &initial.permutation),
            ),
            None => {
                let mut order = vertices.clone();
                order.shuffle(rng);
                let width = get_width(self.graph, &order);
                (order, width)
            }
        };
        let initial_width = best_width;

        'restarts: for restart in 0..self.limits.restarts {
            if best_width <= self.lowerbound || self.timer.stop() {
                break;
            }
            let mut order = vertices.clone();
            order.shuffle(rng);
            let mut width = get_width(self.graph, &order);
            self.offer(&order, width, &mut best_order, &mut best_width);

            for _ in 0..self.limits.steps {
                if self.timer.stop() {
                    debug!("local search stopped during restart {}", restart);
                    break 'restarts;
                }
                if best_width <= self.lowerbound {
                    break 'restarts;
                }
                let i = rng.gen_range(0..order.len());
                let j = rng.gen_range(0..order.len());
                if i == j {
                    continue;
                }
                order.swap(i, j);
                let candidate = get_width(self.graph, &order);
                if candidate < width {
                    width = candidate;
                    self.offer(&order, width, &mut best_order, &mut best_width);
                } else {
                    order.swap(i, j);
                }
            }
        }

        match initial {
            Some(initial) if best_width >= initial_width => initial,
            _ => {
                info!("local search found width {}", best_width);
                EliminationOrderDecomposer::new(self.graph.clone(), best_order).compute()
            }
        }
    }

    fn offer(
        &self,
        order: &[usize],
        width: usize,
        best_order: &mut Vec<usize>,
        best_width: &mut usize,
    ) {
        if width < *best_width {
            *best_width = width;
            best_order.clear();
            best_order.extend_from_slice(order);
            if let Some(progress) = self.progress.as_ref() {
                progress.report(width, SystemTime::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::elimination_order::get_width;
    use crate::graph::{HashMapGraph, MutableGraph};
    use crate::progress::ProgressSink;
    use crate::upperbound::{
        LocalSearchLimits, SimpleLocalSearch, StochasticMinFillDecomposer,
        UpperboundHeuristicType,
    };
    use crate::util::Timer;
    use rand::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

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

    fn bags(result: &crate::elimination_order::PermutationDecompositionResult) -> Vec<Vec<usize>> {
        result
            .tree_decomposition
            .bags
            .iter()
            .map(|b| {
                let mut bag: Vec<_> = b.vertex_set.iter().copied().collect();
                bag.sort_unstable();
                bag
            })
            .collect()
    }

    #[derive(Default)]
    struct CountingSink(AtomicUsize);

    impl ProgressSink for CountingSink {
        fn report(&self, _: usize, _: SystemTime) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let graph = random_graph(40, 0.15, 1);
        let a = StochasticMinFillDecomposer::new(&graph)
            .runs(5)
            .compute(&mut StdRng::seed_from_u64(42));
        let b = StochasticMinFillDecomposer::new(&graph)
            .runs(5)
            .compute(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.permutation, b.permutation);
        assert_eq!(bags(&a), bags(&b));
        assert!(a.tree_decomposition.verify(&graph).is_ok());
    }

    #[test]
    fn all_is_at_least_as_good_as_min_fill() {
        let graph = random_graph(30, 0.2, 2);
        let min_fill =
            UpperboundHeuristicType::MinFill.compute(&graph, 3, &mut StdRng::seed_from_u64(7));
        let all = UpperboundHeuristicType::All.compute(&graph, 3, &mut StdRng::seed_from_u64(7));
        assert!(all.width() <= min_fill.width());
        assert!(all.tree_decomposition.verify(&graph).is_ok());
    }

    #[test]
    fn local_search_never_gets_worse() {
        let graph = random_graph(25, 0.25, 3);
        let mut rng = StdRng::seed_from_u64(5);
        let initial = StochasticMinFillDecomposer::new(&graph).runs(1).compute(&mut rng);
        let initial_width = initial.width();
        let improved = SimpleLocalSearch::new(&graph, LocalSearchLimits::default())
            .run(Some(initial), &mut rng);
        assert!(improved.width() <= initial_width);
        assert_eq!(
            get_width(&graph, &improved.permutation) as isize,
            improved.width()
        );
        assert!(improved.tree_decomposition.verify(&graph).is_ok());
    }

    #[test]
    fn local_search_from_scratch_reports_progress() {
        // a long path: random orders are bad, swaps repair them quickly
        let mut graph = HashMapGraph::new();
        for i in 1..30 {
            graph.add_edge(i - 1, i);
        }
        let sink = Arc::new(CountingSink::default());
        let result = SimpleLocalSearch::new(
            &graph,
            LocalSearchLimits {
                restarts: 3,
                steps: 2000,
            },
        )
        .lowerbound(1)
        .progress(Some(sink.clone()))
        .run(None, &mut StdRng::seed_from_u64(9));
        assert!(result.tree_decomposition.verify(&graph).is_ok());
        assert!(result.width() >= 1);
        assert!(sink.0.load(Ordering::SeqCst) <= 30);
    }

    #[test]
    fn expired_timer_keeps_initial() {
        let graph = random_graph(20, 0.3, 4);
        let mut rng = StdRng::seed_from_u64(6);
        let initial = StochasticMinFillDecomposer::new(&graph).runs(1).compute(&mut rng);
        let permutation = initial.permutation.clone();
        let result = SimpleLocalSearch::new(&graph, LocalSearchLimits::default())
            .timer(Timer::with_budget(Duration::from_secs(0)))
            .run(Some(initial), &mut rng);
        assert_eq!(result.permutation, permutation);
    }
}
