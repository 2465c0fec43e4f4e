#[macro_use]
mod macros;

pub(crate) mod datastructures;

pub mod elimination_order;
pub mod error;
pub mod exact;
pub mod graph;
pub mod heuristic_elimination_order;
pub mod io;
pub mod lowerbound;
pub mod preprocessing;
pub mod progress;
pub mod solver;
pub mod tree_decomposition;
pub mod upperbound;
pub mod util;

#[cfg(feature = "pace-logging")]
pub mod log;
#[cfg(feature = "handle-ctrlc")]
pub mod signals;

pub use error::SolverError;
pub use preprocessing::RuleBasedPreprocessor;
pub use solver::Solver;
