use crate::error::SolverError;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use varisat::{CnfFormula, ExtendFormula, Lit, Var};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown,
}

/// Incremental clause sink in DIMACS numbering.
pub trait SatSolver {
    fn add_clause(&mut self, clause: &[i32]);
    /// `Unknown` once `timeout` has passed without an answer. Backends that cannot be
    /// interrupted keep their worker thread busy until it finishes on its own, so a process
    /// issuing many timed out solves also carries that many running threads.
    fn solve(&mut self, timeout: Option<Duration>) -> Result<SatResult, SolverError>;
    /// Value of `var` in the last model, false if there is none.
    fn value(&self, var: i32) -> bool;
}

#[derive(Default)]
pub struct VarisatSolver {
    clauses: Vec<Vec<i32>>,
    model: Vec<bool>,
}

type Answer = Result<Option<Vec<Lit>>, String>;

impl SatSolver for VarisatSolver {
    fn add_clause(&mut self, clause: &[i32]) {
        self.clauses.push(clause.to_vec());
    }

    fn solve(&mut self, timeout: Option<Duration>) -> Result<SatResult, SolverError> {
        self.model.clear();
        let clauses = self.clauses.clone();
        let (sender, receiver) = mpsc::channel::<Answer>();

        // varisat has no interrupt, on timeout the thread keeps a core busy until it is done
        thread::Builder::new()
            .name("varisat".into())
            .spawn(move || {
                let mut formula = CnfFormula::new();
                for clause in clauses.iter() {
                    let lits: Vec<Lit> = clause
                        .iter()
                        .map(|x| Lit::from_dimacs(*x as isize))
                        .collect();
                    formula.add_clause(&lits);
                }
                let mut solver = varisat::Solver::new();
                solver.add_formula(&formula);
                let answer = match solver.solve() {
                    Ok(true) => Ok(Some(solver.model().unwrap_or_default())),
                    Ok(false) => Ok(None),
                    Err(e) => Err(format!("{:?}", e)),
                };
                let _ = sender.send(answer);
            })
            .map_err(|e| SolverError::SatBackend(e.to_string()))?;

        let answer = match timeout {
            Some(timeout) => match receiver.recv_timeout(timeout) {
                Ok(answer) => answer,
                Err(RecvTimeoutError::Timeout) => return Ok(SatResult::Unknown),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SolverError::SatBackend("solver thread died".into()))
                }
            },
            None => receiver
                .recv()
                .map_err(|_| SolverError::SatBackend("solver thread died".into()))?,
        };

        match answer.map_err(SolverError::SatBackend)? {
            Some(model) => {
                for lit in model {
                    let idx = lit.var().index();
                    if idx >= self.model.len() {
                        self.model.resize(idx + 1, false);
                    }
                    self.model[idx] = lit.is_positive();
                }
                Ok(SatResult::Sat)
            }
            None => Ok(SatResult::Unsat),
        }
    }

    fn value(&self, var: i32) -> bool {
        let idx = Var::from_dimacs(var.abs() as isize).index();
        self.model.get(idx).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::exact::sat_solver::{SatResult, SatSolver, VarisatSolver};
    use std::time::Duration;

    #[test]
    fn small_formulas() {
        let mut solver = VarisatSolver::default();
        solver.add_clause(&[1, 2]);
        solver.add_clause(&[-1]);
        assert_eq!(solver.solve(None), Ok(SatResult::Sat));
        assert!(!solver.value(1));
        assert!(solver.value(2));

        solver.add_clause(&[-2]);
        assert_eq!(
            solver.solve(Some(Duration::from_secs(60))),
            Ok(SatResult::Unsat)
        );
    }

    #[test]
    fn timeout_gives_unknown() {
        // nine pigeons in eight holes
        let (pigeons, holes) = (9, 8);
        let var = |p: i32, h: i32| p * holes + h + 1;
        let mut solver = VarisatSolver::default();
        for p in 0..pigeons {
            let clause: Vec<i32> = (0..holes).map(|h| var(p, h)).collect();
            solver.add_clause(&clause);
        }
        for h in 0..holes {
            for p in 0..pigeons {
                for q in p + 1..pigeons {
                    solver.add_clause(&[-var(p, h), -var(q, h)]);
                }
            }
        }
        assert_eq!(
            solver.solve(Some(Duration::from_millis(0))),
            Ok(SatResult::Unknown)
        );
        assert!(!solver.value(1));
    }

    #[test]
    fn empty_formula_is_satisfiable() {
        let mut solver = VarisatSolver::default();
        assert_eq!(solver.solve(None), Ok(SatResult::Sat));
        assert!(!solver.value(3));
    }
}
