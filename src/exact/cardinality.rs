use std::str::FromStr;

/// Hands out fresh DIMACS variables for auxiliary encodings.
#[derive(Clone, Debug)]
pub struct VariablePool {
    next: i32,
}

impl VariablePool {
    /// Pool whose first variable is `last + 1`.
    pub fn after(last: i32) -> Self {
        Self { next: last + 1 }
    }

    pub fn new_var(&mut self) -> i32 {
        let var = self.next;
        self.next += 1;
        var
    }

    pub fn last(&self) -> i32 {
        self.next - 1
    }
}

pub trait CardinalityEncoder {
    /// Clauses satisfiable iff at most `k` of `vars` are true.
    fn at_most(&self, vars: &[i32], k: usize, pool: &mut VariablePool) -> Vec<Vec<i32>>;
}

/// One clause per subset of size `k + 1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinomialEncoder;

impl CardinalityEncoder for BinomialEncoder {
    fn at_most(&self, vars: &[i32], k: usize, _: &mut VariablePool) -> Vec<Vec<i32>> {
        let mut clauses = vec![];
        if vars.len() <= k {
            return clauses;
        }
        let mut subset: Vec<usize> = (0..=k).collect();
        loop {
            clauses.push(subset.iter().map(|i| -vars[*i]).collect());

            // advance to the next (k+1)-subset in lexicographic order
            let mut i = k + 1;
            loop {
                if i == 0 {
                    return clauses;
                }
                i -= 1;
                if subset[i] < vars.len() - (k + 1 - i) {
                    break;
                }
            }
            subset[i] += 1;
            for j in i + 1..=k {
                subset[j] = subset[j - 1] + 1;
            }
        }
    }
}

/// Sinz' sequential counter, `s[i][j]` states that at least `j + 1` of the first `i + 1`
/// variables are true.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialEncoder;

impl CardinalityEncoder for SequentialEncoder {
    fn at_most(&self, vars: &[i32], k: usize, pool: &mut VariablePool) -> Vec<Vec<i32>> {
        let n = vars.len();
        let mut clauses = vec![];
        if n <= k {
            return clauses;
        }
        if k == 0 {
            clauses.extend(vars.iter().map(|x| vec![-*x]));
            return clauses;
        }

        let s: Vec<Vec<i32>> = (0..n - 1)
            .map(|_| (0..k).map(|_| pool.new_var()).collect())
            .collect();

        clauses.push(vec![-vars[0], s[0][0]]);
        for j in 1..k {
            clauses.push(vec![-s[0][j]]);
        }
        for i in 1..n - 1 {
            clauses.push(vec![-vars[i], s[i][0]]);
            clauses.push(vec![-s[i - 1][0], s[i][0]]);
            for j in 1..k {
                clauses.push(vec![-vars[i], -s[i - 1][j - 1], s[i][j]]);
                clauses.push(vec![-s[i - 1][j], s[i][j]]);
            }
            clauses.push(vec![-vars[i], -s[i - 1][k - 1]]);
        }
        clauses.push(vec![-vars[n - 1], -s[n - 2][k - 1]]);
        clauses
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardinalityEncoding {
    Binomial,
    Sequential,
}

impl Default for CardinalityEncoding {
    fn default() -> Self {
        CardinalityEncoding::Sequential
    }
}

impl CardinalityEncoder for CardinalityEncoding {
    fn at_most(&self, vars: &[i32], k: usize, pool: &mut VariablePool) -> Vec<Vec<i32>> {
        match self {
            CardinalityEncoding::Binomial => BinomialEncoder.at_most(vars, k, pool),
            CardinalityEncoding::Sequential => SequentialEncoder.at_most(vars, k, pool),
        }
    }
}

impl FromStr for CardinalityEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binomial" => Ok(CardinalityEncoding::Binomial),
            "sequential" => Ok(CardinalityEncoding::Sequential),
            other => Err(format!("unknown cardinality encoding: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::exact::cardinality::{
        BinomialEncoder, CardinalityEncoder, CardinalityEncoding, VariablePool,
    };
    use crate::exact::sat_solver::{SatResult, SatSolver, VarisatSolver};

    fn exhaustive(encoding: CardinalityEncoding, n: usize, k: usize) {
        let vars: Vec<i32> = (1..=n as i32).collect();
        for assignment in 0u32..(1 << n) {
            let mut pool = VariablePool::after(n as i32);
            let mut solver = VarisatSolver::default();
            for clause in encoding.at_most(&vars, k, &mut pool) {
                solver.add_clause(&clause);
            }
            for (i, var) in vars.iter().enumerate() {
                if assignment & (1 << i) != 0 {
                    solver.add_clause(&[*var]);
                } else {
                    solver.add_clause(&[-*var]);
                }
            }
            let expected = if assignment.count_ones() as usize <= k {
                SatResult::Sat
            } else {
                SatResult::Unsat
            };
            assert_eq!(solver.solve(None), Ok(expected), "{:b} with k={}", assignment, k);
        }
    }

    #[test]
    fn sequential_counter() {
        for k in 0..4 {
            exhaustive(CardinalityEncoding::Sequential, 5, k);
        }
    }

    #[test]
    fn binomial() {
        for k in 0..4 {
            exhaustive(CardinalityEncoding::Binomial, 5, k);
        }
    }

    #[test]
    fn binomial_clause_count() {
        let mut pool = VariablePool::after(6);
        let clauses = BinomialEncoder.at_most(&[1, 2, 3, 4, 5, 6], 2, &mut pool);
        assert_eq!(clauses.len(), 20);
        assert_eq!(pool.last(), 6);
    }

    #[test]
    fn parse() {
        assert_eq!(
            "binomial".parse::<CardinalityEncoding>(),
            Ok(CardinalityEncoding::Binomial)
        );
        assert_eq!(
            "Sequential".parse::<CardinalityEncoding>(),
            Ok(CardinalityEncoding::Sequential)
        );
        assert!("totalizer".parse::<CardinalityEncoding>().is_err());
    }
}
