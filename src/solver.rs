use crate::error::SolverError;
use crate::exact::{
    CardinalityEncoding, CopsAndRobber, ExactSolver, ExactStrategy, RoutingLimits, SatDecomposer,
};
use crate::graph::{BaseGraph, HashMapGraph};
use crate::lowerbound::LowerboundHeuristicType;
use crate::preprocessing::RuleBasedPreprocessor;
use crate::progress::{LogProgress, ProgressSink};
use crate::tree_decomposition::TreeDecomposition;
use crate::upperbound::{LocalSearchLimits, SimpleLocalSearch, UpperboundHeuristicType};
use crate::util::Timer;
use log::{debug, info};
use rand::prelude::*;
use rayon::prelude::*;
use std::cmp::max;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Computes tree decompositions of minimum width. The graph is split into its connected
/// components, each component is reduced, bounded from both sides and, if the bounds do not
/// meet, solved by one of the exact engines. The component results are glued back together.
#[derive(Clone)]
pub struct Solver {
    parallel: bool,
    seed: Option<u64>,
    apply_reduction_rules: bool,
    almost_simplicial: bool,
    lowerbound: LowerboundHeuristicType,
    upperbound: UpperboundHeuristicType,
    min_fill_runs: usize,
    local_search: Option<LocalSearchLimits>,
    local_search_timeout: Option<Duration>,
    exact_timeout: Option<Duration>,
    cops_vertices_threshold: usize,
    cops_width_threshold: usize,
    memory_budget: u64,
    cardinality_encoding: CardinalityEncoding,
    exact_strategy: Option<ExactStrategy>,
    progress: Option<Arc<dyn ProgressSink>>,
    heuristic_only: bool,
}

impl Default for Solver {
    fn default() -> Self {
        let routing = RoutingLimits::default();
        Self {
            parallel: false,
            seed: None,
            apply_reduction_rules: true,
            almost_simplicial: true,
            lowerbound: LowerboundHeuristicType::default(),
            upperbound: UpperboundHeuristicType::default(),
            min_fill_runs: 5,
            local_search: None,
            local_search_timeout: None,
            exact_timeout: None,
            cops_vertices_threshold: routing.max_vertices,
            cops_width_threshold: routing.max_width,
            memory_budget: routing.memory_budget,
            cardinality_encoding: CardinalityEncoding::default(),
            exact_strategy: None,
            progress: None,
            heuristic_only: false,
        }
    }
}

impl Solver {
    pub fn default_exact() -> Self {
        Self::default()
    }

    /// Upper bound heuristics refined by local search, no exact engine is run.
    pub fn default_heuristic() -> Self {
        Self::default()
            .local_search(Some(LocalSearchLimits::default()))
            .progress(Some(Arc::new(LogProgress)))
            .heuristic_only(true)
    }

    impl_setter!(self, parallel, bool);
    impl_setter!(self, seed, Option<u64>);
    impl_setter!(self, apply_reduction_rules, bool);
    impl_setter!(self, almost_simplicial, bool);
    impl_setter!(self, lowerbound, LowerboundHeuristicType);
    impl_setter!(self, upperbound, UpperboundHeuristicType);
    impl_setter!(self, min_fill_runs, usize);
    impl_setter!(self, local_search, Option<LocalSearchLimits>);
    impl_setter!(self, local_search_timeout, Option<Duration>);
    impl_setter!(self, exact_timeout, Option<Duration>);
    impl_setter!(self, cops_vertices_threshold, usize);
    impl_setter!(self, cops_width_threshold, usize);
    impl_setter!(self, memory_budget, u64);
    impl_setter!(self, cardinality_encoding, CardinalityEncoding);
    impl_setter!(self, exact_strategy, Option<ExactStrategy>);
    impl_setter!(self, progress, Option<Arc<dyn ProgressSink>>);
    impl_setter!(self, heuristic_only, bool);

    pub fn solve(&self, graph: &HashMapGraph) -> Result<TreeDecomposition, SolverError> {
        info!(
            "attempting to solve graph with {} vertices and {} edges",
            graph.order(),
            graph.size()
        );
        if graph.order() == 0 {
            return Ok(TreeDecomposition::default());
        }

        let components = graph.connected_components();
        info!("obtained {} components", components.len());

        // seeds are drawn before forking so that the result does not depend on scheduling
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let tasks: Vec<(HashMapGraph, u64)> = components
            .iter()
            .map(|c| (graph.vertex_induced(c), rng.gen()))
            .collect();

        let results: Vec<Result<TreeDecomposition, SolverError>> = if self.parallel {
            tasks
                .into_par_iter()
                .map(|(component, seed)| self.solve_component(&component, seed))
                .collect()
        } else {
            tasks
                .into_iter()
                .map(|(component, seed)| self.solve_component(&component, seed))
                .collect()
        };
        let parts = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        let td = TreeDecomposition::glue(parts);
        if let Err(e) = td.verify(graph) {
            panic!("computed tree decomposition is invalid: {}", e);
        }
        info!("computed tree decomposition of width {}", td.width());
        self.report(td.width());
        Ok(td)
    }

    fn solve_component(
        &self,
        graph: &HashMapGraph,
        seed: u64,
    ) -> Result<TreeDecomposition, SolverError> {
        let mut rng = StdRng::seed_from_u64(seed);
        debug!("solving component with {} vertices", graph.order());

        let initial_lowerbound = self.lowerbound.compute(graph);
        let reducer = if self.apply_reduction_rules {
            let mut reducer = RuleBasedPreprocessor::new(graph)
                .with_lowerbound(initial_lowerbound)
                .almost_simplicial(self.almost_simplicial);
            if reducer.reduce() {
                debug!("component was fully reduced");
                return Ok(reducer.into_td());
            }
            debug!("reduced component to {} vertices", reducer.graph().order());
            Some(reducer)
        } else {
            None
        };

        let reduced_graph = match reducer.as_ref() {
            Some(reducer) => reducer.graph(),
            None => graph,
        };
        let lowerbound = max(
            max(
                initial_lowerbound,
                reducer.as_ref().map(|r| r.lower_bound).unwrap_or(0),
            ),
            self.lowerbound.compute(reduced_graph),
        );

        let mut upper = self
            .upperbound
            .compute(reduced_graph, self.min_fill_runs, &mut rng);
        if let Some(limits) = self.local_search {
            if upper.width() > lowerbound as isize {
                upper = SimpleLocalSearch::new(reduced_graph, limits)
                    .timer(Timer::new(self.local_search_timeout))
                    .lowerbound(lowerbound)
                    .progress(self.progress.clone())
                    .run(Some(upper), &mut rng);
            }
        }
        let upperbound = max(upper.width(), 0) as usize;
        info!(
            "bounds for component with {} vertices: {} <= tw <= {}",
            reduced_graph.order(),
            lowerbound,
            upperbound
        );

        let td = if self.heuristic_only || lowerbound >= upperbound {
            upper.tree_decomposition
        } else {
            let strategy = self.exact_strategy.unwrap_or_else(|| {
                ExactStrategy::select(reduced_graph.order(), upperbound, &self.routing_limits())
            });
            info!("solving component exactly with {}", strategy);
            let timer = Timer::new(self.exact_timeout);
            match strategy {
                ExactStrategy::CopsAndRobber => {
                    CopsAndRobber::with_bounds(reduced_graph, lowerbound, upperbound)
                        .timer(timer)
                        .compute_exact()?
                }
                ExactStrategy::Sat => SatDecomposer::with_bounds(reduced_graph, lowerbound, upperbound)
                    .encoding(self.cardinality_encoding)
                    .timer(timer)
                    .compute_exact()?,
            }
        };

        if let Err(e) = td.verify(reduced_graph) {
            panic!("tree decomposition of reduced component is invalid: {}", e);
        }
        Ok(match reducer {
            Some(reducer) => reducer.combine_into_td(td),
            None => td,
        })
    }

    fn routing_limits(&self) -> RoutingLimits {
        RoutingLimits {
            max_vertices: self.cops_vertices_threshold,
            max_width: self.cops_width_threshold,
            memory_budget: self.memory_budget,
        }
    }

    fn report(&self, width: isize) {
        if let Some(progress) = self.progress.as_ref() {
            progress.report(max(width, 0) as usize, SystemTime::now());
        }
    }
}
