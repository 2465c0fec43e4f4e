use crate::graph::BaseGraph;
use crate::graph::HashMapGraph;
use crate::graph::MutableGraph;
use crate::tree_decomposition::TreeDecomposition;
use fxhash::FxHashSet;
use log::debug;
use std::borrow::BorrowMut;
use std::cmp::max;
use std::collections::VecDeque;

#[inline]
fn eliminate(v: usize, graph: &mut HashMapGraph, stack: &mut Vec<FxHashSet<usize>>) {
    let mut bag = graph.neighborhood_set(v).clone();
    bag.insert(v);
    stack.push(bag);
    graph.eliminate_vertex(v);
}

/// Removes vertices by width preserving rules until none applies. Every removed vertex leaves
/// its closed neighborhood on a stack, which is replayed in reverse to turn a decomposition of
/// the remaining graph into one of the input graph.
pub struct RuleBasedPreprocessor {
    stack: Vec<FxHashSet<usize>>,
    /// Lower bound on the treewidth of the input graph, the width of every recorded bag is at
    /// most this value.
    pub lower_bound: usize,
    almost_simplicial: bool,
    processed_graph: HashMapGraph,
}

impl RuleBasedPreprocessor {
    pub fn new(graph: &HashMapGraph) -> Self {
        Self {
            stack: vec![],
            lower_bound: 0,
            almost_simplicial: true,
            processed_graph: graph.clone(),
        }
    }

    /// A known lower bound of the input graph. Almost simplicial vertices are only removed
    /// when their degree does not exceed the lower bound.
    pub fn with_lowerbound(mut self, lower_bound: usize) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    pub fn almost_simplicial(mut self, almost_simplicial: bool) -> Self {
        self.almost_simplicial = almost_simplicial;
        self
    }

    /// Returns true iff the whole graph was reduced away.
    pub fn reduce(&mut self) -> bool {
        if self.processed_graph.order() == 0 {
            return true;
        }

        let before = self.processed_graph.order();
        self.remove_low_degree();
        if self.processed_graph.order() == 0 {
            return true;
        }
        let min_degree = self
            .processed_graph
            .vertices()
            .map(|v| self.processed_graph.degree(v))
            .min()
            .unwrap_or(0);
        self.lower_bound = max(self.lower_bound, min_degree);

        while self.apply_rules() {}
        debug!(
            "reduced graph from {} to {} vertices, lower bound {}",
            before,
            self.processed_graph.order(),
            self.lower_bound
        );
        self.processed_graph.order() == 0
    }

    pub fn graph(&self) -> &HashMapGraph {
        &self.processed_graph
    }

    /// Extends a decomposition of the reduced graph to one of the input graph.
    pub fn combine_into_td(mut self, td: TreeDecomposition) -> TreeDecomposition {
        let mut td = td;
        for new_bag in self.stack.drain(..).rev() {
            if td.bags.is_empty() {
                td.add_bag(new_bag);
                continue;
            }
            // the removed vertex itself is not part of any bag yet, so the old bag has to
            // contain everything else
            let old_id = td
                .dfs()
                .find(|old_bag| {
                    new_bag
                        .iter()
                        .filter(|v| !old_bag.vertex_set.contains(*v))
                        .count()
                        <= 1
                })
                .map(|old_bag| old_bag.id)
                .unwrap_or_else(|| panic!("no bag contains the neighborhood {:?}", new_bag));
            let id = td.add_bag(new_bag);
            td.add_edge(old_id, id);
        }
        td
    }

    pub fn into_td(self) -> TreeDecomposition {
        self.combine_into_td(TreeDecomposition::default())
    }

    fn apply_rules(&mut self) -> bool {
        // islet
        let found = self
            .processed_graph
            .vertices()
            .find(|v| self.processed_graph.degree(*v) == 0);
        if let Some(v) = found {
            let mut bag = FxHashSet::with_capacity_and_hasher(1, Default::default());
            bag.insert(v);
            self.stack.push(bag);
            self.processed_graph.remove_vertex(v);
            return true;
        }

        // single-degree
        let found = self
            .processed_graph
            .vertices()
            .find(|v| self.processed_graph.degree(*v) == 1);
        if let Some(v) = found {
            self.lower_bound = max(self.lower_bound, 1);
            eliminate(
                v,
                self.processed_graph.borrow_mut(),
                self.stack.borrow_mut(),
            );
            return true;
        }

        // series, every component left has a cycle
        let found = self
            .processed_graph
            .vertices()
            .find(|v| self.processed_graph.degree(*v) == 2);
        if let Some(v) = found {
            self.lower_bound = max(self.lower_bound, 2);
            eliminate(
                v,
                self.processed_graph.borrow_mut(),
                self.stack.borrow_mut(),
            );
            return true;
        }

        let found = self
            .processed_graph
            .vertices()
            .find(|v| self.processed_graph.is_simplicial(*v));
        if let Some(v) = found {
            self.lower_bound = max(self.lower_bound, self.processed_graph.degree(v));
            eliminate(
                v,
                self.processed_graph.borrow_mut(),
                self.stack.borrow_mut(),
            );
            return true;
        }

        if self.almost_simplicial {
            let found = self.processed_graph.vertices().find(|v| {
                self.processed_graph.degree(*v) <= self.lower_bound
                    && self.processed_graph.is_almost_simplicial(*v)
            });
            if let Some(v) = found {
                eliminate(
                    v,
                    self.processed_graph.borrow_mut(),
                    self.stack.borrow_mut(),
                );
                return true;
            }
        }
        false
    }

    fn remove_low_degree(&mut self) {
        // remove all low degree vertices. First remove all islets, then all islets and 1-degree,
        // then all islets, 1-degree and 2-degree
        for d in 0..3 {
            let mut visited: FxHashSet<usize> = FxHashSet::with_capacity_and_hasher(
                self.processed_graph.order(),
                Default::default(),
            );
            let mut queue = VecDeque::new();
            self.processed_graph
                .vertices()
                .filter(|v| self.processed_graph.degree(*v) <= d)
                .for_each(|v| {
                    visited.insert(v);
                    queue.push_back(v);
                });

            while let Some(v) = queue.pop_front() {
                let mut nb: FxHashSet<_> = self.processed_graph.neighborhood(v).collect();
                if nb.len() > d {
                    continue;
                }
                self.processed_graph.eliminate_vertex(v);
                nb.iter().copied().for_each(|v| {
                    if self.processed_graph.degree(v) <= d && !visited.contains(&v) {
                        queue.push_back(v);
                        visited.insert(v);
                    }
                });
                nb.insert(v);
                self.lower_bound = max(self.lower_bound, nb.len() - 1);
                self.stack.push(nb);
            }
        }
    }
}
