use crate::datastructures::BitSet;
use crate::graph::base_graph::BaseGraph;
use crate::graph::hash_map_graph::HashMapGraph;
use fxhash::FxHashMap;

/// Dense adjacency over the compact indices `0..n`, keeping the map back to the vertices of
/// the graph it was built from.
#[derive(Clone, Debug)]
pub struct BitGraph {
    graph: Vec<BitSet>,
    vertices: Vec<usize>,
}

impl From<&HashMapGraph> for BitGraph {
    fn from(og_graph: &HashMapGraph) -> Self {
        let vertices = og_graph.sorted_vertices();
        let og_to_self: FxHashMap<usize, usize> = vertices
            .iter()
            .enumerate()
            .map(|(idx, v)| (*v, idx))
            .collect();
        let n = vertices.len();
        let mut graph = vec![BitSet::new(n); n];
        for (a, v) in vertices.iter().enumerate() {
            for u in og_graph.neighborhood(*v) {
                graph[a].set_bit(og_to_self[&u]);
            }
        }
        Self { graph, vertices }
    }
}

impl BitGraph {
    pub fn order(&self) -> usize {
        self.graph.len()
    }

    /// Vertex of the original graph behind `idx`.
    pub fn original(&self, idx: usize) -> usize {
        self.vertices[idx]
    }

    pub fn all(&self) -> BitSet {
        BitSet::from_vertices(self.order(), 0..self.order())
    }

    /// Vertices outside of `c` with a neighbor in `c`.
    pub fn exterior_border(&self, c: &BitSet) -> BitSet {
        let mut border = BitSet::new(c.len());
        for v in c.iter() {
            border.or(&self.graph[v])
        }
        border.and_not(c);
        border
    }

    /// Connected components of the subgraph induced by `within`.
    pub fn components_within(&self, within: &BitSet) -> Vec<BitSet> {
        let mut remaining = within.clone();
        let mut components = Vec::new();
        while let Some(start) = remaining.get_first_set() {
            let mut component = BitSet::new(self.order());
            component.set_bit(start);
            remaining.unset_bit(start);
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                for u in self.graph[v].iter() {
                    if remaining.unset_bit(u) {
                        component.set_bit(u);
                        stack.push(u);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{BitGraph, HashMapGraph, MutableGraph};

    #[test]
    fn border_and_components() {
        let mut graph = HashMapGraph::new();
        // path 10 - 20 - 30 - 40 plus the edge 20 - 50
        graph.add_edge(10, 20);
        graph.add_edge(20, 30);
        graph.add_edge(30, 40);
        graph.add_edge(20, 50);

        let bit_graph = BitGraph::from(&graph);
        assert_eq!(bit_graph.order(), 5);
        assert_eq!(bit_graph.original(0), 10);
        assert_eq!(bit_graph.original(4), 50);

        let mut without_20 = bit_graph.all();
        without_20.unset_bit(1);
        let components = bit_graph.components_within(&without_20);
        assert_eq!(components.len(), 3);

        let border = bit_graph.exterior_border(&components[1]);
        assert_eq!(border.iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(components[1].iter().collect::<Vec<_>>(), vec![2, 3]);
    }
}
