use crate::elimination_order::EliminationOrderDecomposer;
use crate::error::SolverError;
use crate::exact::cardinality::{CardinalityEncoder, CardinalityEncoding, VariablePool};
use crate::exact::sat_solver::{SatResult, SatSolver, VarisatSolver};
use crate::exact::{ExactSolver, ExactStrategy};
use crate::graph::{BaseGraph, HashMapGraph};
use crate::tree_decomposition::TreeDecomposition;
use crate::util::{Stopper, Timer};
use fxhash::FxHashMap;
use log::{debug, info, warn};
use std::marker::PhantomData;

/// Ordering based encoding of Samer and Veith: `ord(i, j)` states that `i` is eliminated before
/// `j`, `arc(i, j)` that `j` is a neighbor of `i` in the filled graph and eliminated later.
/// Bounding the out-degree of every vertex by `k` bounds the width by `k`.
pub struct SatDecomposer<'a, S: SatSolver + Default = VarisatSolver> {
    graph: &'a HashMapGraph,
    lowerbound: usize,
    upperbound: usize,
    encoding: CardinalityEncoding,
    timer: Timer,
    _solver: PhantomData<S>,
}

impl<'a> SatDecomposer<'a> {
    pub fn with_graph(graph: &'a HashMapGraph) -> Self {
        let upperbound = graph.order().saturating_sub(1);
        Self::with_bounds(graph, 0, upperbound)
    }

    pub fn with_bounds(graph: &'a HashMapGraph, lowerbound: usize, upperbound: usize) -> Self {
        Self {
            graph,
            lowerbound,
            upperbound,
            encoding: CardinalityEncoding::default(),
            timer: Timer::unlimited(),
            _solver: PhantomData,
        }
    }
}

impl<'a, S: SatSolver + Default> SatDecomposer<'a, S> {
    pub fn encoding(mut self, encoding: CardinalityEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn timer(mut self, timer: Timer) -> Self {
        self.timer = timer;
        self
    }
}

impl<'a, S: SatSolver + Default> ExactSolver for SatDecomposer<'a, S> {
    fn compute_exact(self) -> Result<TreeDecomposition, SolverError> {
        if self.graph.order() == 0 {
            return Ok(TreeDecomposition::default());
        }
        let vertices = self.graph.sorted_vertices();
        let index: FxHashMap<usize, usize> = vertices
            .iter()
            .enumerate()
            .map(|(idx, v)| (*v, idx))
            .collect();
        let variables = Variables::new(vertices.len());

        for k in self.lowerbound..=self.upperbound {
            if self.timer.stop() {
                warn!("sat: time budget exhausted before width {}", k);
                return Err(SolverError::Timeout {
                    strategy: ExactStrategy::Sat,
                });
            }
            let mut solver = S::default();
            let clauses = encode(self.graph, &index, &variables, k, &self.encoding);
            debug!("sat: width {} with {} clauses", k, clauses.len());
            for clause in clauses.iter() {
                solver.add_clause(clause);
            }

            match solver.solve(self.timer.remaining())? {
                SatResult::Unsat => continue,
                SatResult::Unknown => {
                    warn!("sat: no answer for width {} within the time budget", k);
                    return Err(SolverError::Timeout {
                        strategy: ExactStrategy::Sat,
                    });
                }
                SatResult::Sat => {
                    let order = variables.decode(&solver, &vertices);
                    let result =
                        EliminationOrderDecomposer::new(self.graph.clone(), order).compute();
                    assert!(
                        result.width() <= k as isize,
                        "model decoded to width {} instead of {}",
                        result.width(),
                        k
                    );
                    info!("sat: treewidth is {}", k);
                    return Ok(result.tree_decomposition);
                }
            }
        }
        Err(SolverError::InvalidUpperbound {
            upperbound: self.upperbound,
        })
    }
}

struct Variables {
    n: usize,
}

impl Variables {
    fn new(n: usize) -> Self {
        Self { n }
    }

    /// `ord(i, j)` for `i < j`, its negation otherwise.
    fn ord(&self, i: usize, j: usize) -> i32 {
        debug_assert_ne!(i, j);
        if i < j {
            self.ord_var(i, j)
        } else {
            -self.ord_var(j, i)
        }
    }

    fn ord_var(&self, i: usize, j: usize) -> i32 {
        // row-major index into the strict upper triangle
        let before = i * self.n - i * (i + 1) / 2;
        (before + (j - i - 1)) as i32 + 1
    }

    fn arc(&self, i: usize, j: usize) -> i32 {
        debug_assert_ne!(i, j);
        (self.n * (self.n - 1) / 2 + i * self.n + j) as i32 + 1
    }

    fn last(&self) -> i32 {
        (self.n * (self.n - 1) / 2 + self.n * self.n) as i32
    }

    /// Vertices sorted by their number of predecessors.
    fn decode<S: SatSolver>(&self, solver: &S, vertices: &[usize]) -> Vec<usize> {
        let mut ranked: Vec<(usize, usize)> = (0..self.n)
            .map(|i| {
                let predecessors = (0..self.n)
                    .filter(|j| *j != i && literal_value(solver, self.ord(*j, i)))
                    .count();
                (predecessors, i)
            })
            .collect();
        ranked.sort_unstable();
        ranked.into_iter().map(|(_, i)| vertices[i]).collect()
    }
}

fn literal_value<S: SatSolver>(solver: &S, literal: i32) -> bool {
    solver.value(literal.abs()) == (literal > 0)
}

fn encode(
    graph: &HashMapGraph,
    index: &FxHashMap<usize, usize>,
    variables: &Variables,
    k: usize,
    encoder: &CardinalityEncoding,
) -> Vec<Vec<i32>> {
    let n = variables.n;
    let mut clauses = vec![];

    // transitivity of the elimination order
    for i in 0..n {
        for j in (0..n).filter(|j| *j != i) {
            for l in (0..n).filter(|l| *l != i && *l != j) {
                clauses.push(vec![
                    -variables.ord(i, j),
                    -variables.ord(j, l),
                    variables.ord(i, l),
                ]);
            }
        }
    }

    // edges point from the earlier to the later endpoint
    for u in graph.vertices() {
        for v in graph.neighborhood(u) {
            let (i, j) = (index[&u], index[&v]);
            if i < j {
                clauses.push(vec![-variables.ord(i, j), variables.arc(i, j)]);
                clauses.push(vec![variables.ord(i, j), variables.arc(j, i)]);
            }
        }
    }

    for i in 0..n {
        for j in (0..n).filter(|j| *j != i) {
            // arcs follow the order and never form 2-cycles
            clauses.push(vec![-variables.arc(i, j), variables.ord(i, j)]);
            if i < j {
                clauses.push(vec![-variables.arc(i, j), -variables.arc(j, i)]);
            }
            // later neighbors of a vertex become adjacent
            for l in (j + 1..n).filter(|l| *l != i) {
                clauses.push(vec![
                    -variables.arc(i, j),
                    -variables.arc(i, l),
                    -variables.ord(j, l),
                    variables.arc(j, l),
                ]);
                clauses.push(vec![
                    -variables.arc(i, j),
                    -variables.arc(i, l),
                    variables.ord(j, l),
                    variables.arc(l, j),
                ]);
            }
        }
    }

    let mut pool = VariablePool::after(variables.last());
    for i in 0..n {
        let out_arcs: Vec<i32> = (0..n)
            .filter(|j| *j != i)
            .map(|j| variables.arc(i, j))
            .collect();
        clauses.extend(encoder.at_most(&out_arcs, k, &mut pool));
    }
    clauses
}
