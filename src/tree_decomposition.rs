use crate::datastructures::BitSet;
use crate::graph::BaseGraph;
use fxhash::{FxHashMap, FxHashSet};
use std::cmp::{max, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeDecompositionValidationError {
    #[error("Has Cycle")]
    HasCycle,
    #[error("Not Connected")]
    NotConnected,
    #[error("Missing Vertex: {0}")]
    MissingVertex(usize),
    #[error("Missing Edge: {0:?}")]
    MissingEdge((usize, usize)),
    #[error("Not Inducing Subtree: {0}")]
    NotInducingSubtree(usize),
}

#[derive(Debug, Clone, Default)]
pub struct TreeDecomposition {
    pub bags: Vec<Bag>,
    pub root: Option<usize>,
    pub max_bag_size: usize,
}

impl TreeDecomposition {
    /// Adds an isolated bag and returns its id. The first bag becomes the root.
    pub fn add_bag(&mut self, vertex_set: FxHashSet<usize>) -> usize {
        let id = self.bags.len();
        if id == 0 {
            self.root = Some(id);
        }
        self.max_bag_size = max(self.max_bag_size, vertex_set.len());
        self.bags.push(Bag {
            id,
            vertex_set,
            neighbors: FxHashSet::default(),
        });
        id
    }

    pub fn add_edge(&mut self, b1: usize, b2: usize) {
        assert!(b1 < self.bags.len());
        assert!(b2 < self.bags.len());
        assert_ne!(b1, b2);
        self.bags[b1].neighbors.insert(b2);
        self.bags[b2].neighbors.insert(b1);
    }

    pub fn bags(&self) -> &[Bag] {
        &self.bags
    }

    /// Largest bag size minus one, `-1` for the empty decomposition.
    pub fn width(&self) -> isize {
        self.max_bag_size as isize - 1
    }

    pub fn edge_count(&self) -> usize {
        self.bags.iter().map(|b| b.neighbors.len()).sum::<usize>() / 2
    }

    pub fn dfs(&self) -> TreeDecompositionIterator {
        let mut visited = BitSet::new(self.bags.len());
        let stack = match self.root {
            Some(root) => {
                visited.set_bit(root);
                vec![root]
            }
            None => vec![],
        };
        TreeDecompositionIterator {
            td: self,
            stack,
            visited,
        }
    }

    /// Joins decompositions of vertex-disjoint graphs: a fresh empty root bag, the bags and
    /// edges of every part copied with new ids, and one edge from each non-empty part to the
    /// root. Contains `1 + Σ bags` bags and has the maximum width of the parts.
    pub fn glue(parts: Vec<TreeDecomposition>) -> TreeDecomposition {
        let mut td = TreeDecomposition::default();
        let glue_point = td.add_bag(FxHashSet::default());
        for part in parts {
            let offset = td.bags.len();
            let part_root = part.root;
            td.max_bag_size = max(td.max_bag_size, part.max_bag_size);
            td.bags.extend(part.bags.into_iter().map(|mut bag| {
                bag.id += offset;
                bag.neighbors = bag.neighbors.iter().map(|n| *n + offset).collect();
                bag
            }));
            if let Some(part_root) = part_root {
                td.add_edge(glue_point, part_root + offset);
            }
        }
        td
    }

    pub fn verify<G: BaseGraph>(&self, graph: &G) -> Result<(), TreeDecompositionValidationError> {
        if !self.is_connected() {
            return Err(TreeDecompositionValidationError::NotConnected);
        }

        if !self.bags.is_empty() && self.edge_count() != self.bags.len() - 1 {
            return Err(TreeDecompositionValidationError::HasCycle);
        }

        let mut occurrences: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for bag in &self.bags {
            for v in bag.vertex_set.iter() {
                occurrences.entry(*v).or_default().push(bag.id);
            }
        }

        if let Some(v) = graph.vertices().find(|v| !occurrences.contains_key(v)) {
            return Err(TreeDecompositionValidationError::MissingVertex(v));
        }

        for u in graph.vertices() {
            for v in graph.neighborhood(u).filter(|v| u < *v) {
                let covered = occurrences[&u]
                    .iter()
                    .any(|id| self.bags[*id].vertex_set.contains(&v));
                if !covered {
                    return Err(TreeDecompositionValidationError::MissingEdge((u, v)));
                }
            }
        }

        for (v, bags) in occurrences.iter() {
            if !self.induces_subtree(*v, bags) {
                return Err(TreeDecompositionValidationError::NotInducingSubtree(*v));
            }
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.dfs().count() == self.bags.len()
    }

    fn induces_subtree(&self, v: usize, bags: &[usize]) -> bool {
        let mut visited = BitSet::new(self.bags.len());
        visited.set_bit(bags[0]);
        let mut reached = 1;
        let mut stack = vec![bags[0]];
        while let Some(c) = stack.pop() {
            for n in self.bags[c].neighbors.iter().copied() {
                if !visited[n] && self.bags[n].vertex_set.contains(&v) {
                    visited.set_bit(n);
                    reached += 1;
                    stack.push(n);
                }
            }
        }
        reached == bags.len()
    }
}

pub struct TreeDecompositionIterator<'a> {
    td: &'a TreeDecomposition,
    stack: Vec<usize>,
    visited: BitSet,
}

impl<'a> Iterator for TreeDecompositionIterator<'a> {
    type Item = &'a Bag;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        for c in self.td.bags[current].neighbors.iter().copied() {
            if !self.visited.set_bit(c) {
                self.stack.push(c);
            }
        }
        self.td.bags.get(current)
    }
}

/// A bag is identified by its creation index inside its decomposition.
#[derive(Debug, Default, Clone)]
pub struct Bag {
    pub id: usize,
    pub vertex_set: FxHashSet<usize>,
    pub neighbors: FxHashSet<usize>,
}

impl PartialEq for Bag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Bag {}

impl PartialOrd for Bag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{HashMapGraph, MutableGraph};
    use crate::tree_decomposition::{TreeDecomposition, TreeDecompositionValidationError};
    use fxhash::FxHashSet;

    fn set(vertices: &[usize]) -> FxHashSet<usize> {
        vertices.iter().copied().collect()
    }

    fn path(n: usize) -> HashMapGraph {
        let mut graph = HashMapGraph::new();
        for i in 1..n {
            graph.add_edge(i - 1, i);
        }
        graph
    }

    #[test]
    fn empty_decomposition() {
        let td = TreeDecomposition::default();
        assert_eq!(td.width(), -1);
        assert!(td.verify(&HashMapGraph::new()).is_ok());
        assert!(matches!(
            td.verify(&path(2)),
            Err(TreeDecompositionValidationError::MissingVertex(_))
        ));
    }

    #[test]
    fn valid_path_decomposition() {
        let mut td = TreeDecomposition::default();
        let a = td.add_bag(set(&[0, 1]));
        let b = td.add_bag(set(&[1, 2]));
        let c = td.add_bag(set(&[2, 3]));
        td.add_edge(a, b);
        td.add_edge(b, c);
        assert_eq!(td.root, Some(a));
        assert_eq!(td.width(), 1);
        assert!(td.verify(&path(4)).is_ok());
        assert_eq!(td.dfs().count(), 3);
    }

    #[test]
    fn detects_violations() {
        let graph = path(4);

        let mut missing_edge = TreeDecomposition::default();
        let a = missing_edge.add_bag(set(&[0, 1]));
        let b = missing_edge.add_bag(set(&[2, 3]));
        missing_edge.add_edge(a, b);
        assert_eq!(
            missing_edge.verify(&graph),
            Err(TreeDecompositionValidationError::MissingEdge((1, 2)))
        );

        let mut not_connected = TreeDecomposition::default();
        not_connected.add_bag(set(&[0, 1, 2]));
        not_connected.add_bag(set(&[2, 3]));
        assert_eq!(
            not_connected.verify(&graph),
            Err(TreeDecompositionValidationError::NotConnected)
        );

        let mut cycle = TreeDecomposition::default();
        let a = cycle.add_bag(set(&[0, 1]));
        let b = cycle.add_bag(set(&[1, 2]));
        let c = cycle.add_bag(set(&[2, 3]));
        cycle.add_edge(a, b);
        cycle.add_edge(b, c);
        cycle.add_edge(c, a);
        assert_eq!(
            cycle.verify(&graph),
            Err(TreeDecompositionValidationError::HasCycle)
        );

        let mut broken_subtree = TreeDecomposition::default();
        let a = broken_subtree.add_bag(set(&[0, 1]));
        let b = broken_subtree.add_bag(set(&[2, 3]));
        let c = broken_subtree.add_bag(set(&[1, 2]));
        broken_subtree.add_edge(a, b);
        broken_subtree.add_edge(b, c);
        assert_eq!(
            broken_subtree.verify(&graph),
            Err(TreeDecompositionValidationError::NotInducingSubtree(1))
        );
    }

    #[test]
    fn glue_keeps_parts_and_adds_one_bag() {
        let mut first = TreeDecomposition::default();
        let a = first.add_bag(set(&[0, 1, 2]));
        let b = first.add_bag(set(&[1, 2]));
        first.add_edge(a, b);

        let mut second = TreeDecomposition::default();
        let a = second.add_bag(set(&[10, 11]));
        let b = second.add_bag(set(&[11, 12]));
        let c = second.add_bag(set(&[12]));
        second.add_edge(a, b);
        second.add_edge(b, c);

        let mut graph = HashMapGraph::new();
        graph.make_clique(&[0, 1, 2]);
        graph.add_edge(10, 11);
        graph.add_edge(11, 12);

        let glued = TreeDecomposition::glue(vec![first, second]);
        assert_eq!(glued.bags.len(), 1 + 2 + 3);
        assert_eq!(glued.edge_count(), glued.bags.len() - 1);
        assert_eq!(glued.width(), 2);
        assert!(glued.bags[0].vertex_set.is_empty());
        assert!(glued.verify(&graph).is_ok());
    }

    #[test]
    fn bags_are_ordered_by_id() {
        let mut td = TreeDecomposition::default();
        td.add_bag(set(&[5]));
        td.add_bag(set(&[1]));
        assert!(td.bags[0] < td.bags[1]);
    }
}
