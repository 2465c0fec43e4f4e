use crate::graph::base_graph::BaseGraph;
use crate::graph::mutable_graph::MutableGraph;
use fxhash::FxHashMap;
use fxhash::FxHashSet;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HashMapGraph {
    data: FxHashMap<usize, FxHashSet<usize>>,
}

impl HashMapGraph {
    pub fn has_vertex(&self, u: usize) -> bool {
        self.data.contains_key(&u)
    }

    pub fn neighborhood_set(&self, u: usize) -> &FxHashSet<usize> {
        self.data
            .get(&u)
            .unwrap_or_else(|| panic!("vertex {} is not part of the graph", u))
    }

    pub fn connected_components(&self) -> Vec<FxHashSet<usize>> {
        self.separate(&FxHashSet::default())
    }

    /// Connected components of the graph after removing `separator`.
    pub fn separate(&self, separator: &FxHashSet<usize>) -> Vec<FxHashSet<usize>> {
        let mut components: Vec<FxHashSet<_>> = Vec::with_capacity(2);

        let mut stack: Vec<_> = Vec::with_capacity(self.data.len());
        let mut visited = FxHashSet::with_capacity_and_hasher(self.data.len(), Default::default());
        let mut roots: Vec<usize> = self.data.keys().copied().collect();
        // components are reported in order of their smallest vertex
        roots.sort_unstable();
        for u in roots {
            if separator.contains(&u) || visited.contains(&u) {
                continue;
            }
            stack.push(u);
            visited.insert(u);
            let mut component: FxHashSet<_> = FxHashSet::default();
            component.insert(u);
            while let Some(v) = stack.pop() {
                for x in self.neighborhood_set(v).iter() {
                    if component.contains(x) || separator.contains(x) {
                        continue;
                    }
                    stack.push(*x);
                    component.insert(*x);
                    visited.insert(*x);
                }
            }
            components.push(component);
        }
        components
    }

    pub fn vertex_induced(&self, vertices: &FxHashSet<usize>) -> Self {
        let data: FxHashMap<usize, FxHashSet<usize>> = self
            .data
            .iter()
            .filter(|(vertex, _)| vertices.contains(vertex))
            .map(|(vertex, neighborhood)| {
                (
                    *vertex,
                    neighborhood
                        .iter()
                        .copied()
                        .filter(|x| vertices.contains(x))
                        .collect(),
                )
            })
            .collect();
        Self { data }
    }

    pub fn from_graph<G: BaseGraph>(graph: &G) -> Self {
        let data = graph
            .vertices()
            .map(|v| (v, graph.neighborhood(v).collect()))
            .collect();
        HashMapGraph { data }
    }

    /// Vertices in ascending order.
    pub fn sorted_vertices(&self) -> Vec<usize> {
        let mut vertices: Vec<_> = self.data.keys().copied().collect();
        vertices.sort_unstable();
        vertices
    }
}

impl MutableGraph for HashMapGraph {
    fn add_vertex(&mut self, u: usize) {
        self.data.entry(u).or_insert_with(FxHashSet::default);
    }

    fn add_vertex_with_capacity(&mut self, u: usize, capacity: usize) {
        self.data
            .entry(u)
            .or_insert_with(|| FxHashSet::with_capacity_and_hasher(capacity, Default::default()));
    }

    fn remove_vertex(&mut self, u: usize) {
        if let Some(neighbors) = self.data.remove(&u) {
            for i in neighbors.iter() {
                if let Some(nb) = self.data.get_mut(i) {
                    nb.remove(&u);
                }
            }
        }
    }

    fn add_edge(&mut self, u: usize, v: usize) {
        assert_ne!(u, v, "self loops are not supported");
        self.data.entry(u).or_insert_with(FxHashSet::default).insert(v);
        self.data.entry(v).or_insert_with(FxHashSet::default).insert(u);
    }

    fn remove_edge(&mut self, u: usize, v: usize) {
        assert_ne!(u, v);
        if let Some(x) = self.data.get_mut(&u) {
            x.remove(&v);
        }
        if let Some(x) = self.data.get_mut(&v) {
            x.remove(&u);
        }
    }

    fn eliminate_vertex(&mut self, u: usize) {
        let nb = self
            .data
            .remove(&u)
            .unwrap_or_else(|| panic!("vertex {} is not part of the graph", u));
        for i in &nb {
            let neighbors = self.data.get_mut(i).expect("adjacency is symmetric");
            neighbors.remove(&u);
            neighbors.extend(nb.iter().copied().filter(|j| j != i));
        }
    }

    fn contract(&mut self, u: usize, v: usize) {
        assert_ne!(u, v);
        assert!(self.data.contains_key(&v));
        let nb = self
            .data
            .remove(&u)
            .unwrap_or_else(|| panic!("vertex {} is not part of the graph", u));

        for vertex in nb {
            if vertex == v {
                continue;
            }
            let a = self.data.get_mut(&vertex).expect("adjacency is symmetric");
            a.remove(&u);
            a.insert(v);
            self.data.get_mut(&v).expect("checked above").insert(vertex);
        }
        if let Some(b) = self.data.get_mut(&v) {
            b.remove(&u);
        }
    }

    fn new() -> Self {
        HashMapGraph {
            data: FxHashMap::default(),
        }
    }

    fn with_capacity(capacity: usize) -> Self {
        HashMapGraph {
            data: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }
}

impl BaseGraph for HashMapGraph {
    fn degree(&self, u: usize) -> usize {
        self.neighborhood_set(u).len()
    }

    fn order(&self) -> usize {
        self.data.len()
    }

    fn size(&self) -> usize {
        self.data.values().map(|nb| nb.len()).sum::<usize>() / 2
    }

    fn is_clique(&self, vertices: &[usize]) -> bool {
        for (i, v) in vertices.iter().enumerate() {
            for u in vertices.iter().skip(i + 1) {
                if !self.has_edge(*v, *u) {
                    return false;
                }
            }
        }
        true
    }

    fn is_neighborhood_clique(&self, u: usize) -> bool {
        let nb: Vec<_> = self.neighborhood_set(u).iter().copied().collect();
        self.is_clique(&nb)
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        self.data.get(&u).map_or(false, |nb| nb.contains(&v))
    }

    fn is_simplicial(&self, u: usize) -> bool {
        self.is_neighborhood_clique(u)
    }

    fn is_almost_simplicial(&self, u: usize) -> bool {
        // every missing edge among the neighbors has to share one common endpoint
        let mut candidates: Option<FxHashSet<usize>> = None;
        let nb = self.neighborhood_set(u);
        for v in nb.iter().copied() {
            for w in nb
                .iter()
                .copied()
                .filter(|w| v < *w && !self.has_edge(v, *w))
            {
                match candidates.as_mut() {
                    Some(candidates) => {
                        candidates.retain(|x| *x == v || *x == w);
                        if candidates.is_empty() {
                            return false;
                        }
                    }
                    None => {
                        candidates = Some([v, w].iter().copied().collect());
                    }
                }
            }
        }
        true
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.data.keys().copied())
    }

    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.neighborhood_set(u).iter().copied())
    }

    fn fill_in_count(&self, u: usize) -> usize {
        let nb = self.neighborhood_set(u);
        let mut count = 0;
        for x in nb {
            for y in nb {
                if x < y && !self.has_edge(*x, *y) {
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::base_graph::BaseGraph;
    use crate::graph::hash_map_graph::HashMapGraph;
    use crate::graph::mutable_graph::MutableGraph;
    use fxhash::FxHashSet;

    #[test]
    fn test_order() {
        let mut graph = HashMapGraph::new();
        assert_eq!(graph.order(), 0);

        graph.add_vertex(0);
        graph.add_vertex(0);
        assert_eq!(graph.order(), 1);
        graph.remove_vertex(0);
        assert_eq!(graph.order(), 0);

        graph.add_vertex_with_capacity(0, 0);
        graph.add_vertex_with_capacity(0, 0);
        assert_eq!(graph.order(), 1);
    }

    #[test]
    fn test_degree() {
        let mut graph = HashMapGraph::new();
        graph.add_edge(0, 1);

        assert_eq!(graph.degree(0), 1);
        assert_eq!(graph.degree(1), 1);
        assert_eq!(graph.order(), 2);
        assert_eq!(graph.size(), 1);

        graph.add_edge(0, 1);

        assert_eq!(graph.degree(0), 1);
        assert_eq!(graph.size(), 1);

        graph.remove_edge(0, 1);

        assert_eq!(graph.degree(0), 0);
        assert_eq!(graph.degree(1), 0);
        assert_eq!(graph.order(), 2);
    }

    #[test]
    #[should_panic]
    fn self_loop_is_rejected() {
        let mut graph = HashMapGraph::new();
        graph.add_edge(3, 3);
    }

    #[test]
    fn eliminate_creates_clique() {
        let mut graph = HashMapGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(0, 3);
        graph.add_edge(3, 4);

        assert_eq!(graph.fill_in_count(0), 3);
        graph.eliminate_vertex(0);

        assert!(!graph.has_vertex(0));
        assert!(graph.is_clique(&[1, 2, 3]));
        assert_eq!(graph.degree(3), 3);
        assert_eq!(graph.size(), 4);
    }

    #[test]
    fn contract_merges_neighborhoods() {
        let mut graph = HashMapGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(1, 3);

        graph.contract(0, 1);

        assert!(!graph.has_vertex(0));
        let nb: FxHashSet<_> = graph.neighborhood(1).collect();
        assert_eq!(nb, [2, 3].iter().copied().collect());
        assert!(graph.has_edge(2, 1));
    }

    #[test]
    fn simplicial_and_almost_simplicial() {
        let mut graph = HashMapGraph::new();
        // 0 is adjacent to the triangle 1, 2, 3
        graph.make_clique(&[0, 1, 2, 3]);
        // 4 sees the triangle plus 5, which is only adjacent to 4
        graph.add_edge(4, 1);
        graph.add_edge(4, 2);
        graph.add_edge(4, 3);
        graph.add_edge(4, 5);
        // 6 sees two disjoint non-edges
        graph.add_edge(6, 9);
        graph.add_edge(6, 5);
        graph.add_edge(6, 7);
        graph.add_edge(6, 8);

        assert!(graph.is_simplicial(0));
        assert!(graph.is_almost_simplicial(0));
        assert!(!graph.is_simplicial(4));
        assert!(graph.is_almost_simplicial(4));
        assert!(!graph.is_almost_simplicial(6));
    }

    #[test]
    fn components_and_induced_subgraphs() {
        let mut graph = HashMapGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(5, 6);
        graph.add_vertex(9);

        let components = graph.connected_components();
        assert_eq!(components.len(), 3);
        assert!(components[0].contains(&0) && components[0].len() == 3);
        assert!(components[1].contains(&5) && components[1].len() == 2);
        assert!(components[2].contains(&9));

        let sub = graph.vertex_induced(&components[0]);
        assert_eq!(sub.order(), 3);
        assert_eq!(sub.size(), 2);

        let separator: FxHashSet<usize> = [1].iter().copied().collect();
        assert_eq!(sub.separate(&separator).len(), 2);
    }
}
