use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
use crate::tree_decomposition::TreeDecomposition;
use fxhash::FxHashMap;

/// Builds the tree decomposition induced by eliminating the vertices of a graph in a fixed
/// order. Vertex `permutation[i]` ends up in bag `i` together with its neighbors at the time it
/// is eliminated; that bag hangs below the bag of the earliest eliminated of those neighbors.
pub struct EliminationOrderDecomposer {
    graph: HashMapGraph,
    permutation: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct PermutationDecompositionResult {
    pub permutation: Vec<usize>,
    pub tree_decomposition: TreeDecomposition,
    pub eliminated_in_bag: FxHashMap<usize, usize>,
}

impl PermutationDecompositionResult {
    pub fn width(&self) -> isize {
        self.tree_decomposition.width()
    }
}

impl EliminationOrderDecomposer {
    pub fn new(graph: HashMapGraph, permutation: Vec<usize>) -> Self {
        assert_eq!(
            graph.order(),
            permutation.len(),
            "elimination order has to contain every vertex exactly once"
        );
        Self { graph, permutation }
    }

    pub fn compute(self) -> PermutationDecompositionResult {
        let mut graph = self.graph;
        let eliminated_in_bag: FxHashMap<usize, usize> = self
            .permutation
            .iter()
            .enumerate()
            .map(|(idx, v)| (*v, idx))
            .collect();
        assert_eq!(eliminated_in_bag.len(), self.permutation.len());

        let mut tree_decomposition = TreeDecomposition::default();
        let mut parents: Vec<Option<usize>> = Vec::with_capacity(self.permutation.len());
        for v in self.permutation.iter().copied() {
            let mut bag = graph.neighborhood_set(v).clone();
            parents.push(bag.iter().map(|u| eliminated_in_bag[u]).min());
            bag.insert(v);
            tree_decomposition.add_bag(bag);
            graph.eliminate_vertex(v);
        }

        // one root per connected component, extra roots are attached to the first one
        let mut root = None;
        for (id, parent) in parents.into_iter().enumerate() {
            match (parent, root) {
                (Some(parent), _) => tree_decomposition.add_edge(id, parent),
                (None, None) => root = Some(id),
                (None, Some(root)) => tree_decomposition.add_edge(root, id),
            }
        }
        tree_decomposition.root = root;

        PermutationDecompositionResult {
            permutation: self.permutation,
            tree_decomposition,
            eliminated_in_bag,
        }
    }
}

/// Width of the decomposition induced by `order` without materializing any bags. `0` for the
/// empty order.
pub fn get_width<G: MutableGraph>(graph: &G, order: &[usize]) -> usize {
    let mut graph = graph.clone();
    order
        .iter()
        .map(|v| {
            let degree = graph.degree(*v);
            graph.eliminate_vertex(*v);
            degree
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use crate::elimination_order::{get_width, EliminationOrderDecomposer};
    use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};

    fn cycle(n: usize) -> HashMapGraph {
        let mut graph = HashMapGraph::new();
        for i in 0..n {
            graph.add_edge(i, (i + 1) % n);
        }
        graph
    }

    #[test]
    fn cycle_has_width_two() {
        let graph = cycle(6);
        let result = EliminationOrderDecomposer::new(graph.clone(), (0..6).collect()).compute();
        assert_eq!(result.width(), 2);
        assert_eq!(result.tree_decomposition.bags.len(), 6);
        assert!(result.tree_decomposition.verify(&graph).is_ok());
        assert_eq!(get_width(&graph, &result.permutation), 2);
        assert_eq!(result.eliminated_in_bag[&3], 3);
        assert!(result.tree_decomposition.bags[3].vertex_set.contains(&3));
    }

    #[test]
    fn bad_order_on_star() {
        let mut graph = HashMapGraph::new();
        for leaf in 1..6 {
            graph.add_edge(0, leaf);
        }
        let good = EliminationOrderDecomposer::new(graph.clone(), vec![1, 2, 3, 4, 5, 0]).compute();
        assert_eq!(good.width(), 1);
        let bad = EliminationOrderDecomposer::new(graph.clone(), vec![0, 1, 2, 3, 4, 5]).compute();
        assert_eq!(bad.width(), 5);
        assert!(bad.tree_decomposition.verify(&graph).is_ok());
    }

    #[test]
    fn disconnected_graph_yields_one_tree() {
        let mut graph = cycle(4);
        graph.add_edge(10, 11);
        graph.add_vertex(20);
        let order = graph.sorted_vertices();
        let result = EliminationOrderDecomposer::new(graph.clone(), order).compute();
        let td = &result.tree_decomposition;
        assert_eq!(td.edge_count(), td.bags.len() - 1);
        assert!(td.verify(&graph).is_ok());
        assert_eq!(result.width(), 2);
    }

    #[test]
    fn deterministic_for_a_fixed_order() {
        let mut graph = cycle(7);
        graph.add_edge(0, 3);
        graph.add_edge(2, 5);
        let order = vec![6, 1, 4, 0, 2, 5, 3];

        let sorted_bags = |graph: &HashMapGraph| {
            let result = EliminationOrderDecomposer::new(graph.clone(), order.clone()).compute();
            let mut bags: Vec<Vec<usize>> = result
                .tree_decomposition
                .bags
                .iter()
                .map(|b| {
                    let mut bag: Vec<_> = b.vertex_set.iter().copied().collect();
                    bag.sort_unstable();
                    bag
                })
                .collect();
            bags.sort();
            (result.width(), bags)
        };
        assert_eq!(sorted_bags(&graph), sorted_bags(&graph.clone()));
        assert_eq!(graph.order(), 7);
    }

    #[test]
    #[should_panic]
    fn rejects_incomplete_order() {
        let graph = cycle(4);
        EliminationOrderDecomposer::new(graph, vec![0, 1, 2]);
    }
}
