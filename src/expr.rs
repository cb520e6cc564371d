//! Clause/literal data model of a CNF formula
//!
//! A [Formula] owns every piece of search state: the clause arena, the
//! [Assignment] of the underlying variables, the trail, and the
//! backtracking frames. [Literal] and [Clause] are plain values that are
//! interpreted against the formula's assignment.

mod clause;
mod formula;
mod literal;
mod variables;

pub use clause::Clause;
pub use formula::{ClauseId, Formula, Terminal};
pub use literal::{Assignment, Conflict, Literal};
pub use variables::{VarId, Variables};
