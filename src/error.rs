use crate::exact::ExactStrategy;
use std::io;
use thiserror::Error;

/// Failures of a solve. Invalid decompositions are never reported through this type; they
/// indicate a bug and panic at the point of verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("{strategy} exceeded its time budget")]
    Timeout { strategy: ExactStrategy },
    #[error("sat backend failure: {0}")]
    SatBackend(String),
    #[error("no tree decomposition of width at most {upperbound} exists")]
    InvalidUpperbound { upperbound: usize },
}

/// Timeouts map to `TimedOut`, the CLI exits with the message instead of writing a decomposition.
impl From<SolverError> for io::Error {
    fn from(error: SolverError) -> Self {
        let kind = match error {
            SolverError::Timeout { .. } => io::ErrorKind::TimedOut,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, error)
    }
}
