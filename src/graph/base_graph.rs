use std::fmt::Debug;

/// Read-only queries on an undirected simple graph over `usize` vertices.
pub trait BaseGraph: Clone + Debug {
    fn degree(&self, u: usize) -> usize;
    fn order(&self) -> usize;
    /// Number of edges.
    fn size(&self) -> usize;
    fn is_clique(&self, vertices: &[usize]) -> bool;
    fn is_neighborhood_clique(&self, u: usize) -> bool;
    fn has_edge(&self, u: usize, v: usize) -> bool;
    fn is_simplicial(&self, u: usize) -> bool;
    /// True if all but at most one neighbor of `u` form a clique. Simplicial vertices are
    /// almost simplicial as well.
    fn is_almost_simplicial(&self, u: usize) -> bool;
    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_>;
    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_>;
    /// Number of edges missing between neighbors of `u`.
    fn fill_in_count(&self, u: usize) -> usize;
}
