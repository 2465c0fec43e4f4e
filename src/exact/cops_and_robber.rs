use crate::datastructures::BitSet;
use crate::elimination_order::EliminationOrderDecomposer;
use crate::error::SolverError;
use crate::exact::{ExactSolver, ExactStrategy};
use crate::graph::{BaseGraph, BitGraph, HashMapGraph};
use crate::tree_decomposition::TreeDecomposition;
use crate::util::{Stopper, Timer};
use fxhash::FxHashMap;
use log::{debug, info};

/// Winning move of the cops for a robber region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Move {
    /// Region and border fit into a single bag.
    Fill,
    /// A cop lands on the vertex, every component left over is winning on its own.
    Place(usize),
}

/// Decides treewidth at most `k` with the monotone cops and robber game: `k + 1` cops, the
/// robber lives in a connected region `R` and the cops occupy its border `N(R)`. Regions are
/// memoised, so the table grows with the number of connected sets with a border of at most `k`
/// vertices.
pub struct CopsAndRobber<'a> {
    graph: &'a HashMapGraph,
    lowerbound: usize,
    upperbound: usize,
    timer: Timer,
}

impl<'a> CopsAndRobber<'a> {
    pub fn with_graph(graph: &'a HashMapGraph) -> Self {
        let upperbound = graph.order().saturating_sub(1);
        Self::with_bounds(graph, 0, upperbound)
    }

    pub fn with_bounds(graph: &'a HashMapGraph, lowerbound: usize, upperbound: usize) -> Self {
        Self {
            graph,
            lowerbound,
            upperbound,
            timer: Timer::unlimited(),
        }
    }

    pub fn timer(mut self, timer: Timer) -> Self {
        self.timer = timer;
        self
    }
}

impl<'a> ExactSolver for CopsAndRobber<'a> {
    fn compute_exact(self) -> Result<TreeDecomposition, SolverError> {
        if self.graph.order() == 0 {
            return Ok(TreeDecomposition::default());
        }
        let bit_graph = BitGraph::from(self.graph);
        let components = bit_graph.components_within(&bit_graph.all());

        for k in self.lowerbound..=self.upperbound {
            debug!("cops and robber: trying width {}", k);
            let mut game = Game {
                graph: &bit_graph,
                k,
                memory: FxHashMap::default(),
                timer: &self.timer,
            };
            let mut won = true;
            for component in components.iter() {
                if !game.wins(component)? {
                    won = false;
                    break;
                }
            }
            debug!("cops and robber: {} regions explored", game.memory.len());
            if !won {
                continue;
            }

            let mut order = Vec::with_capacity(bit_graph.order());
            for component in components.iter() {
                game.elimination_order(component, &mut order);
            }
            let order: Vec<usize> = order.into_iter().map(|v| bit_graph.original(v)).collect();
            let result = EliminationOrderDecomposer::new(self.graph.clone(), order).compute();
            assert!(
                result.width() <= k as isize,
                "winning strategy produced width {} instead of {}",
                result.width(),
                k
            );
            info!("cops and robber: treewidth is {}", k);
            return Ok(result.tree_decomposition);
        }
        Err(SolverError::InvalidUpperbound {
            upperbound: self.upperbound,
        })
    }
}

struct Game<'a> {
    graph: &'a BitGraph,
    k: usize,
    memory: FxHashMap<BitSet, Option<Move>>,
    timer: &'a Timer,
}

impl<'a> Game<'a> {
    fn wins(&mut self, region: &BitSet) -> Result<bool, SolverError> {
        if let Some(winning) = self.memory.get(region) {
            return Ok(winning.is_some());
        }
        if self.timer.stop() {
            return Err(SolverError::Timeout {
                strategy: ExactStrategy::CopsAndRobber,
            });
        }

        let border = self.graph.exterior_border(region).cardinality();
        let winning = if border > self.k {
            None
        } else if border + region.cardinality() <= self.k + 1 {
            Some(Move::Fill)
        } else {
            let mut found = None;
            for v in region.iter() {
                let mut rest = region.clone();
                rest.unset_bit(v);
                let mut all_win = true;
                for component in self.graph.components_within(&rest) {
                    if !self.wins(&component)? {
                        all_win = false;
                        break;
                    }
                }
                if all_win {
                    found = Some(Move::Place(v));
                    break;
                }
            }
            found
        };
        self.memory.insert(region.clone(), winning);
        Ok(winning.is_some())
    }

    /// Post-order of the winning strategy: sub-regions first, then the vertex separating them.
    fn elimination_order(&self, region: &BitSet, order: &mut Vec<usize>) {
        match self.memory.get(region) {
            Some(Some(Move::Fill)) => order.extend(region.iter()),
            Some(Some(Move::Place(v))) => {
                let mut rest = region.clone();
                rest.unset_bit(*v);
                for component in self.graph.components_within(&rest) {
                    self.elimination_order(&component, order);
                }
                order.push(*v);
            }
            _ => panic!("region is not winning for the cops"),
        }
    }
}
