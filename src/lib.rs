//! Chronological backtracking SAT solver for CNF formulas
//!
//! ```rust
//! use flipsat::{backtrack, Formula};
//!
//! let formula: Formula = "{{a}, {-a, b}}".parse().unwrap();
//! let (satisfiable, model) = backtrack(formula).into_parts();
//! assert!(satisfiable);
//! assert_eq!(model.unwrap()["b"], true);
//! ```

mod backtrack;
mod benchmark;
mod brute_force;
mod expr;
mod generator;
mod parser;

#[cfg(test)]
mod testing;

pub use backtrack::{backtrack, Solver, Stats, Step};
pub use benchmark::*;
pub use brute_force::*;
pub use expr::*;
pub use generator::*;
pub use parser::*;

use std::collections::BTreeMap;

/// Truth value of every variable, by name
pub type Model = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Solution {
    /// Find a satisfying assignment
    Sat(Model),
    /// Prove unsatisfiability
    UnSat,
}

impl Solution {
    pub fn as_sat(&self) -> Option<&Model> {
        match self {
            Solution::Sat(model) => Some(model),
            Solution::UnSat => None,
        }
    }

    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Sat(_))
    }

    /// Split into the verdict and the model, present only if satisfiable
    pub fn into_parts(self) -> (bool, Option<Model>) {
        match self {
            Solution::Sat(model) => (true, Some(model)),
            Solution::UnSat => (false, None),
        }
    }
}
