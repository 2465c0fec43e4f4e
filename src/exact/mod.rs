use crate::error::SolverError;
use crate::tree_decomposition::TreeDecomposition;
use num::BigUint;
use std::fmt;

pub mod cardinality;
pub mod cops_and_robber;
pub mod sat;
pub mod sat_solver;

pub use cardinality::{CardinalityEncoder, CardinalityEncoding, VariablePool};
pub use cops_and_robber::CopsAndRobber;
pub use sat::SatDecomposer;
pub use sat_solver::{SatResult, SatSolver, VarisatSolver};

pub trait ExactSolver {
    fn compute_exact(self) -> Result<TreeDecomposition, SolverError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExactStrategy {
    CopsAndRobber,
    Sat,
}

impl fmt::Display for ExactStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExactStrategy::CopsAndRobber => write!(f, "cops and robber"),
            ExactStrategy::Sat => write!(f, "sat"),
        }
    }
}

/// Limits under which the pursuit game is preferred over the SAT encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoutingLimits {
    pub max_vertices: usize,
    pub max_width: usize,
    /// Bytes the game table may occupy.
    pub memory_budget: u64,
}

impl Default for RoutingLimits {
    fn default() -> Self {
        Self {
            max_vertices: 25,
            max_width: 8,
            memory_budget: 1 << 30,
        }
    }
}

impl ExactStrategy {
    pub fn select(order: usize, upperbound: usize, limits: &RoutingLimits) -> Self {
        if order <= limits.max_vertices
            && upperbound <= limits.max_width
            && expected_memory(order, upperbound) < BigUint::from(limits.memory_budget)
        {
            ExactStrategy::CopsAndRobber
        } else {
            ExactStrategy::Sat
        }
    }
}

/// Estimated size in bytes of the game table for `order` vertices and width `upperbound`:
/// `C(order, upperbound + 1) * (order + 32) / 8`.
pub fn expected_memory(order: usize, upperbound: usize) -> BigUint {
    binomial(order, upperbound + 1) * BigUint::from(order + 32) / BigUint::from(8u32)
}

pub fn binomial(n: usize, k: usize) -> BigUint {
    if k > n {
        return BigUint::from(0u32);
    }
    let k = k.min(n - k);
    let mut result = BigUint::from(1u32);
    for i in 0..k {
        result = result * BigUint::from(n - i) / BigUint::from(i + 1);
    }
    result
}
