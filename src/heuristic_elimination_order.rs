use crate::elimination_order::{EliminationOrderDecomposer, PermutationDecompositionResult};
use crate::graph::BaseGraph;
use crate::graph::HashMapGraph;
use crate::graph::MutableGraph;
use fxhash::FxHashMap;
use rand::prelude::*;

pub trait Selector: From<HashMapGraph> {
    fn graph(&self) -> &HashMapGraph;
    fn value(&self, v: usize) -> i64;
    fn eliminate_vertex(&mut self, v: usize);
}

pub struct MinDegreeSelector {
    graph: HashMapGraph,
}

impl From<HashMapGraph> for MinDegreeSelector {
    fn from(graph: HashMapGraph) -> Self {
        Self { graph }
    }
}

impl Selector for MinDegreeSelector {
    fn graph(&self) -> &HashMapGraph {
        &self.graph
    }

    fn value(&self, v: usize) -> i64 {
        self.graph.degree(v) as i64
    }

    fn eliminate_vertex(&mut self, v: usize) {
        self.graph.eliminate_vertex(v);
    }
}

/// Keeps, for every vertex, the number of edges among its neighbors so that fill-in values are
/// available in constant time while eliminating.
pub struct MinFillSelector {
    graph: HashMapGraph,
    cache: FxHashMap<usize, usize>,
}

impl From<HashMapGraph> for MinFillSelector {
    fn from(graph: HashMapGraph) -> Self {
        let mut cache = FxHashMap::with_capacity_and_hasher(graph.order(), Default::default());
        for u in graph.vertices() {
            cache.insert(u, 0);
        }
        for u in graph.vertices() {
            for v in graph.neighborhood(u).filter(|v| u < *v) {
                graph
                    .neighborhood_set(u)
                    .iter()
                    .copied()
                    .filter(|x| v < *x && graph.has_edge(*x, v))
                    .for_each(|x| {
                        *cache.get_mut(&x).unwrap() += 1;
                        *cache.get_mut(&u).unwrap() += 1;
                        *cache.get_mut(&v).unwrap() += 1;
                    })
            }
        }
        Self { graph, cache }
    }
}

impl Selector for MinFillSelector {
    fn graph(&self) -> &HashMapGraph {
        &self.graph
    }

    fn value(&self, v: usize) -> i64 {
        self.fill_in_count(v) as i64
    }

    fn eliminate_vertex(&mut self, v: usize) {
        if self.fill_in_count(v) == 0 {
            self.eliminate_fill0(v);
        } else {
            let mut to_add: Vec<(usize, usize)> = vec![];
            for u in self.graph.neighborhood_set(v) {
                for w in self
                    .graph
                    .neighborhood_set(v)
                    .iter()
                    .filter(|w| u < *w && !self.graph.has_edge(*u, **w))
                {
                    to_add.push((*u, *w));
                }
            }
            for (u, w) in to_add {
                self.add_edge(u, w);
            }
            self.remove_vertex(v);
        }
    }
}

impl MinFillSelector {
    fn add_edge(&mut self, u: usize, v: usize) {
        self.graph.add_edge(u, v);
        let cache = &mut self.cache;
        for x in self.graph.neighborhood_set(u) {
            if self.graph.has_edge(*x, v) {
                *cache.get_mut(x).unwrap() += 1;
                *cache.get_mut(&u).unwrap() += 1;
                *cache.get_mut(&v).unwrap() += 1;
            }
        }
    }

    fn remove_vertex(&mut self, u: usize) {
        for v in self.graph.neighborhood_set(u).clone() {
            self.remove_edge(u, v);
        }
        self.graph.remove_vertex(u);
        self.cache.remove(&u);
    }

    fn remove_edge(&mut self, u: usize, v: usize) {
        self.graph.remove_edge(u, v);
        let cache = &mut self.cache;
        for x in self.graph.neighborhood_set(u) {
            if self.graph.has_edge(*x, v) {
                *cache.get_mut(x).unwrap() -= 1;
                *cache.get_mut(&u).unwrap() -= 1;
                *cache.get_mut(&v).unwrap() -= 1;
            }
        }
    }

    // a simplicial vertex only takes its own edges out of the neighborhoods around it
    fn eliminate_fill0(&mut self, u: usize) {
        if self.graph.degree(u) > 1 {
            let delta = self.graph.degree(u) - 1;
            let cache = &mut self.cache;
            self.graph.neighborhood_set(u).iter().for_each(|v| {
                *cache.get_mut(v).unwrap() -= delta;
            });
        }
        self.graph.remove_vertex(u);
        self.cache.remove(&u);
    }

    fn fill_in_count(&self, u: usize) -> usize {
        let deg = self.graph.degree(u);
        (deg * deg - deg) / 2 - self.cache[&u]
    }
}

pub type MinFillDecomposer = HeuristicEliminationDecomposer<MinFillSelector>;
pub type MinDegreeDecomposer = HeuristicEliminationDecomposer<MinDegreeSelector>;

/// Greedy elimination: repeatedly eliminates a vertex of minimum selector value, breaking ties
/// uniformly at random.
pub struct HeuristicEliminationDecomposer<S: Selector> {
    selector: S,
}

impl<S: Selector> HeuristicEliminationDecomposer<S> {
    pub fn with_graph(graph: &HashMapGraph) -> Self {
        Self {
            selector: S::from(graph.clone()),
        }
    }

    pub fn elimination_order<R: Rng>(mut self, rng: &mut R) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.selector.graph().order());
        let mut candidates: Vec<usize> = Vec::new();
        while self.selector.graph().order() > 0 {
            candidates.clear();
            let mut best = i64::MAX;
            for v in self.selector.graph().vertices() {
                let value = self.selector.value(v);
                if value < best {
                    best = value;
                    candidates.clear();
                }
                if value == best {
                    candidates.push(v);
                }
            }
            candidates.sort_unstable();
            let v = *candidates
                .choose(rng)
                .expect("a non-empty graph has a vertex of minimum value");
            self.selector.eliminate_vertex(v);
            order.push(v);
        }
        order
    }

    pub fn compute<R: Rng>(self, rng: &mut R) -> PermutationDecompositionResult {
        let graph = self.selector.graph().clone();
        let order = self.elimination_order(rng);
        EliminationOrderDecomposer::new(graph, order).compute()
    }
}
