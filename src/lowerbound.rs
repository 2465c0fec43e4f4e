use crate::datastructures::BinaryQueue;
use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
use std::cmp::max;

pub trait LowerboundHeuristic {
    fn compute<G: MutableGraph>(graph: &G) -> usize;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LowerboundHeuristicType {
    MinDegree,
    MinorMinWidth,
}

impl LowerboundHeuristicType {
    pub fn compute<G: MutableGraph>(&self, graph: &G) -> usize {
        match self {
            LowerboundHeuristicType::MinDegree => MinDegree::compute(graph),
            LowerboundHeuristicType::MinorMinWidth => MinorMinWidth::compute(graph),
        }
    }
}

impl Default for LowerboundHeuristicType {
    fn default() -> Self {
        LowerboundHeuristicType::MinorMinWidth
    }
}

pub struct MinDegree;

impl LowerboundHeuristic for MinDegree {
    fn compute<G: MutableGraph>(graph: &G) -> usize {
        graph.vertices().map(|v| graph.degree(v)).min().unwrap_or(0)
    }
}

/// Contracts a minimum degree vertex into the neighbor that keeps the merged vertex as large as
/// possible until no edge is left. Every contraction yields a minor, whose minimum degree bounds
/// the treewidth of the original graph from below.
pub struct MinorMinWidth;

impl LowerboundHeuristic for MinorMinWidth {
    fn compute<G: MutableGraph>(graph: &G) -> usize {
        let mut graph = HashMapGraph::from_graph(graph);
        let mut queue = BinaryQueue::new();
        for v in graph.vertices() {
            queue.insert(v, graph.degree(v) as i64);
        }

        let mut lb = 0;
        while let Some((v, degree)) = queue.pop_min() {
            if degree == 0 {
                graph.remove_vertex(v);
                continue;
            }
            lb = max(lb, degree as usize);

            let u = graph
                .neighborhood(v)
                .map(|u| (u, merged_degree(&graph, v, u)))
                .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
                .map(|(u, _)| u)
                .expect("vertex of positive degree has a neighbor");

            let neighbors: Vec<usize> = graph.neighborhood(v).collect();
            graph.contract(v, u);
            for w in neighbors {
                queue.insert(w, graph.degree(w) as i64);
            }
        }
        lb
    }
}

fn merged_degree(graph: &HashMapGraph, v: usize, u: usize) -> usize {
    let nv = graph.neighborhood_set(v);
    let nu = graph.neighborhood_set(u);
    nv.len() + nu.iter().filter(|w| !nv.contains(w)).count() - 2
}
