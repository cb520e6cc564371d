//! Chronological backtracking search with branch-and-flip
//!
//! One round of the search:
//!
//! 1. prune tautologies,
//! 2. clean (drop satisfied clauses and falsified literals),
//! 3. force every unit clause, flipping on conflict,
//! 4. clean, mark clauses with a true literal, clean,
//! 5. stop if no clause is left (SAT), or flip if some clause is empty,
//! 6. otherwise branch on the first literal of the first open clause,
//! 7. clean.
//!
//! A flip reverts the innermost decision and tries its false branch. When
//! no decision can be flipped anymore the formula is unsatisfiable.

mod frame;
mod undo;

pub(crate) use frame::{Frame, FrameStack};
pub(crate) use undo::{Checkpoint, Undo, UndoLog};

use crate::{Formula, Solution, Terminal, VarId};
use either::Either;
use serde::{Deserialize, Serialize};
use std::fmt;

pub fn backtrack(formula: Formula) -> Solution {
    Solver::new(formula).solve()
}

/// Step of a round after which the observer is called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Prune,
    Clean,
    Propagate,
    CheckValues,
    Decide,
    Flip,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Prune => "prune",
            Step::Clean => "clean",
            Step::Propagate => "propagate",
            Step::CheckValues => "check values",
            Step::Decide => "decide",
            Step::Flip => "flip",
        };
        write!(f, "{name}")
    }
}

/// Counters of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub rounds: usize,
    pub decisions: usize,
    pub flips: usize,
    /// Assignments forced by unit clauses
    pub propagations: usize,
    pub conflicts: usize,
}

pub struct Solver<'a> {
    formula: Formula,
    observer: Option<Box<dyn FnMut(Step, &Formula) + 'a>>,
    stats: Stats,
}

impl<'a> Solver<'a> {
    pub fn new(formula: Formula) -> Self {
        Self {
            formula,
            observer: None,
            stats: Stats::default(),
        }
    }

    /// Call `observer` with the formula after every step, e.g. to trace the search
    pub fn observe(mut self, observer: impl FnMut(Step, &Formula) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    fn notify(&mut self, step: Step) {
        if let Some(observer) = self.observer.as_mut() {
            observer(step, &self.formula);
        }
    }

    fn name(&self, var: VarId) -> &str {
        self.formula.variables().name(var)
    }

    /// Try the false branch of the innermost pending decision.
    /// Returns `false` if no decision is left to flip.
    fn flip(&mut self) -> bool {
        self.stats.conflicts += 1;
        let Some((var, value)) = self.formula.flip() else {
            return false;
        };
        self.stats.flips += 1;
        log::trace!(
            "Flip: {} = {} at depth {}",
            self.name(var),
            value,
            self.formula.depth()
        );
        self.notify(Step::Flip);
        true
    }

    fn sat(&self) -> Solution {
        log::debug!("SAT: {:?}", self.stats);
        Solution::Sat(self.formula.model())
    }

    fn unsat(&self) -> Solution {
        log::debug!("UNSAT: {:?}", self.stats);
        Solution::UnSat
    }

    /// Run the search to the end
    ///
    /// The formula is left in its final state, so this is meant to be called once.
    pub fn solve(&mut self) -> Solution {
        'round: loop {
            self.stats.rounds += 1;

            self.formula.prune();
            self.notify(Step::Prune);
            self.formula.clean();
            self.notify(Step::Clean);

            match self.formula.propagate_units() {
                Ok(forced) => {
                    self.stats.propagations += forced;
                    self.notify(Step::Propagate);
                }
                Err(conflict) => {
                    log::trace!("Conflict on {}", self.name(conflict.var));
                    if self.flip() {
                        continue 'round;
                    }
                    return self.unsat();
                }
            }

            self.formula.clean();
            self.notify(Step::Clean);
            self.formula.check_values();
            self.notify(Step::CheckValues);
            self.formula.clean();
            self.notify(Step::Clean);

            let clause = match self.formula.select() {
                Either::Left(Terminal::Satisfied) => return self.sat(),
                Either::Left(Terminal::Falsified) => {
                    log::trace!("Falsified clause at depth {}", self.formula.depth());
                    if self.flip() {
                        continue 'round;
                    }
                    return self.unsat();
                }
                Either::Right(clause) => clause,
            };

            self.stats.decisions += 1;
            match self.formula.decide(clause) {
                Ok((var, value)) => {
                    log::trace!(
                        "Decision: {} = {} at depth {}",
                        self.name(var),
                        value,
                        self.formula.depth()
                    );
                    self.notify(Step::Decide);
                }
                Err(conflict) => {
                    log::trace!("Conflict on {}", self.name(conflict.var));
                    if self.flip() {
                        continue 'round;
                    }
                    return self.unsat();
                }
            }

            self.formula.clean();
            self.notify(Step::Clean);
        }
    }
}
