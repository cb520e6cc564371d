use crate::{ClauseId, Literal, VarId};

/// A mutation of a [crate::Formula] with what is needed to revert it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Undo {
    /// The variable was unassigned before
    Assign(VarId),
    /// The clause was not marked as always true
    AlwaysTrue(ClauseId),
    /// The clause was part of the formula
    Remove(ClauseId),
    /// Literals of the clause before falsified ones were dropped
    Literals {
        clause: ClauseId,
        prior: Vec<Literal>,
    },
}

/// Position in the undo log and the trail to restore on backtrack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checkpoint {
    pub undo: usize,
    pub trail: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UndoLog(Vec<Undo>);

impl UndoLog {
    pub fn record(&mut self, undo: Undo) {
        self.0.push(undo);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take every entry recorded after `until`, newest first
    pub fn rollback(&mut self, until: usize) -> impl Iterator<Item = Undo> + '_ {
        debug_assert!(until <= self.0.len(), "Checkpoint beyond the log");
        self.0.drain(until..).rev()
    }
}
