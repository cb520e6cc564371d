use super::{Assignment, Clause, Conflict, Literal, VarId, Variables};
use crate::{
    backtrack::{Checkpoint, Frame, FrameStack, Undo, UndoLog},
    FormatError, Model,
};
use either::Either;
use proptest::prelude::*;
use std::{fmt, str::FromStr};

/// Stable index of a clause in a [Formula]
///
/// Clauses removed by the clean step keep their slot, so the index of a
/// clause never changes during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClauseId(usize);

impl ClauseId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// State in which no decision can be made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// Every clause has been satisfied and removed
    Satisfied,
    /// Some clause lost all of its literals
    Falsified,
}

/// A conjunction of clauses together with the search state over it
///
/// The formula is mutated in place by the steps of the solver. Every
/// mutation made while a decision is pending is written to an undo log, and
/// [Formula::flip] reverts the log down to the checkpoint of the decision,
/// which restores the clauses, the assignment, and the trail at once.
///
/// ```rust
/// use flipsat::Formula;
///
/// let formula: Formula = "{{a, -b}, {c}}".parse().unwrap();
/// assert_eq!(formula.num_clauses(), 2);
/// assert_eq!(formula.variables().len(), 3);
/// assert_eq!(formula.to_string(), "{{a,-b},{c}}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formula {
    clauses: Vec<Clause>,
    variables: Variables,
    values: Assignment,
    /// Every assignment in the order it has been made
    trail: Vec<(VarId, bool)>,
    frames: FrameStack,
    undo: UndoLog,
}

impl FromStr for Formula {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

impl Formula {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause of `(name, negated)` literals
    pub fn add_clause<'a>(
        &mut self,
        literals: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> ClauseId {
        assert!(
            self.frames.is_empty(),
            "Clauses cannot be added during the search"
        );
        let literals: Vec<Literal> = literals
            .into_iter()
            .map(|(name, negated)| Literal::new(self.variables.intern(name), negated))
            .collect();
        self.values.grow(self.variables.len());
        self.clauses.push(Clause::new(literals));
        ClauseId(self.clauses.len() - 1)
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn values(&self) -> &Assignment {
        &self.values
    }

    /// Clauses which have not been removed, in their original order
    pub fn clauses(&self) -> impl Iterator<Item = (ClauseId, &Clause)> {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| !clause.removed)
            .map(|(i, clause)| (ClauseId(i), clause))
    }

    pub fn clause(&self, id: ClauseId) -> &Clause {
        &self.clauses[id.0]
    }

    /// Number of clauses which have not been removed
    pub fn num_clauses(&self) -> usize {
        self.clauses().count()
    }

    pub fn trail(&self) -> impl Iterator<Item = (&str, bool)> {
        self.trail
            .iter()
            .map(|&(var, value)| (self.variables.name(var), value))
    }

    /// Number of pending decisions
    pub fn depth(&self) -> usize {
        self.frames.depth()
    }

    /// Mark tautological clauses as always true. Returns the number of newly marked clauses.
    pub fn prune(&mut self) -> usize {
        let mut marked = 0;
        for i in 0..self.clauses.len() {
            let clause = &mut self.clauses[i];
            if !clause.removed && clause.mark_tautology_if_present() {
                self.record(Undo::AlwaysTrue(ClauseId(i)));
                marked += 1;
            }
        }
        marked
    }

    /// Remove always-true clauses and drop falsified literals from the others
    pub fn clean(&mut self) {
        for i in 0..self.clauses.len() {
            let clause = &mut self.clauses[i];
            if clause.removed {
                continue;
            }
            if clause.always_true {
                clause.removed = true;
                self.record(Undo::Remove(ClauseId(i)));
            } else if let Some(prior) = clause.drop_falsified_literals(&self.values) {
                self.record(Undo::Literals {
                    clause: ClauseId(i),
                    prior,
                });
            }
        }
    }

    /// Force every unit clause in a single pass over the formula
    ///
    /// Returns the number of new assignments, or the [Conflict] of a unit
    /// clause whose variable has been assigned the opposite value already.
    pub fn propagate_units(&mut self) -> Result<usize, Conflict> {
        let mut forced = 0;
        for i in 0..self.clauses.len() {
            let clause = &self.clauses[i];
            if clause.removed || clause.always_true {
                continue;
            }
            let Some((var, value)) = clause.force_unit_true() else {
                continue;
            };
            if self.propagate(var, value)? {
                log::trace!("Unit: {} = {}", self.variables.name(var), value);
                forced += 1;
            }
        }
        Ok(forced)
    }

    /// Mark clauses with a true literal as always true. Returns the number of newly marked clauses.
    pub fn check_values(&mut self) -> usize {
        let mut marked = 0;
        for i in 0..self.clauses.len() {
            let clause = &mut self.clauses[i];
            if !clause.removed && clause.mark_satisfied_if_any_true(&self.values) {
                self.record(Undo::AlwaysTrue(ClauseId(i)));
                marked += 1;
            }
        }
        marked
    }

    /// Decide whether the search is over, or which clause to branch on next
    pub fn select(&self) -> Either<Terminal, ClauseId> {
        if self.clauses().any(|(_, clause)| clause.is_falsified()) {
            return Either::Left(Terminal::Falsified);
        }
        match self.first_open_clause() {
            Some(id) => Either::Right(id),
            None => Either::Left(Terminal::Satisfied),
        }
    }

    /// Open a new frame and set the first literal of `clause` to true
    pub fn decide(&mut self, clause: ClauseId) -> Result<(VarId, bool), Conflict> {
        assert!(self.is_open(clause), "Decision on a closed clause");
        let checkpoint = self.checkpoint();
        self.frames.push(Frame::new(checkpoint, clause));
        let (var, value) = self.clauses[clause.0]
            .branch_first_literal(true)
            .expect("Open clause has a literal");
        self.propagate(var, value)?;
        Ok((var, value))
    }

    /// Retry the innermost decision which has not been flipped yet with the false branch
    ///
    /// Frames whose both branches have failed are discarded on the way.
    /// Returns the flipped assignment, or `None` when every frame is exhausted.
    pub fn flip(&mut self) -> Option<(VarId, bool)> {
        while let Some(frame) = self.frames.top().copied() {
            if frame.flipped {
                self.frames.pop();
                continue;
            }
            self.restore(frame.checkpoint);
            self.frames.mark_flipped();

            // The checkpoint is taken right before the decision, so the
            // stored clause is always open again here.
            let clause = if self.is_open(frame.clause) {
                frame.clause
            } else {
                match self.first_open_clause() {
                    Some(clause) => clause,
                    None => continue,
                }
            };
            let (var, value) = self.clauses[clause.0]
                .branch_first_literal(false)
                .expect("Open clause has a literal");
            if self.propagate(var, value).is_ok() {
                return Some((var, value));
            }
        }
        None
    }

    /// Assignment of every variable in the formula
    ///
    /// Variables never assigned during the search are set to `false`.
    pub fn model(&self) -> Model {
        let mut model: Model = self
            .variables
            .iter()
            .map(|(_, name)| (name.to_string(), false))
            .collect();
        for &(var, value) in &self.trail {
            model.insert(self.variables.name(var).to_string(), value);
        }
        model
    }

    /// Check that every remaining clause has a literal which is true under `model`
    ///
    /// Variables missing in `model` are regarded as `false`.
    ///
    /// ```rust
    /// use flipsat::Formula;
    /// use maplit::btreemap;
    ///
    /// let formula: Formula = "{{a, b}, {-a}}".parse().unwrap();
    /// assert!(formula.evaluate(&btreemap! { "b".to_string() => true }));
    /// assert!(!formula.evaluate(&btreemap! { "a".to_string() => true }));
    /// ```
    pub fn evaluate(&self, model: &Model) -> bool {
        self.clauses().all(|(_, clause)| {
            clause.literals().iter().any(|lit| {
                let value = model
                    .get(self.variables.name(lit.var))
                    .copied()
                    .unwrap_or(false);
                value ^ lit.negated
            })
        })
    }

    fn is_open(&self, id: ClauseId) -> bool {
        self.clauses
            .get(id.0)
            .is_some_and(|c| !c.removed && !c.always_true && !c.is_falsified())
    }

    fn first_open_clause(&self) -> Option<ClauseId> {
        (0..self.clauses.len())
            .map(ClauseId)
            .find(|&id| self.is_open(id))
    }

    /// Adopt `value` for `var`, recording it on the trail if it is new
    fn propagate(&mut self, var: VarId, value: bool) -> Result<bool, Conflict> {
        let assigned = self.values.propagate_from(var, value)?;
        if assigned {
            self.record(Undo::Assign(var));
            self.trail.push((var, value));
        }
        Ok(assigned)
    }

    /// Nothing needs to be recorded before the first decision since it is never reverted
    fn record(&mut self, undo: Undo) {
        if !self.frames.is_empty() {
            self.undo.record(undo);
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            undo: self.undo.len(),
            trail: self.trail.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        for undo in self.undo.rollback(checkpoint.undo) {
            match undo {
                Undo::Assign(var) => self.values.unassign(var),
                Undo::AlwaysTrue(id) => self.clauses[id.0].always_true = false,
                Undo::Remove(id) => self.clauses[id.0].removed = false,
                Undo::Literals { clause, prior } => self.clauses[clause.0].literals = prior,
            }
        }
        self.trail.truncate(checkpoint.trail);
    }
}

/// Brace notation of the remaining clauses
///
/// Assigned literals are shown as `True` or `False`, an always-true clause
/// as `⊤`, a falsified clause as `⊥`, and a formula without clauses as `⊤`.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.num_clauses() == 0 {
            return write!(f, "⊤");
        }
        write!(f, "{{")?;
        for (i, (_, clause)) in self.clauses().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if clause.is_always_true() {
                write!(f, "⊤")?;
                continue;
            }
            if clause.is_falsified() {
                write!(f, "⊥")?;
                continue;
            }
            write!(f, "{{")?;
            for (j, lit) in clause.literals().iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                match lit.resolved_value(&self.values) {
                    Some(true) => write!(f, "True")?,
                    Some(false) => write!(f, "False")?,
                    None if lit.negated => write!(f, "-{}", self.variables.name(lit.var))?,
                    None => write!(f, "{}", self.variables.name(lit.var))?,
                }
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}

impl Arbitrary for Formula {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let literal = (0..5usize, any::<bool>());
        proptest::collection::vec(proptest::collection::vec(literal, 1..4), 0..8)
            .prop_map(|clauses| {
                let mut formula = Formula::new();
                for clause in clauses {
                    let names: Vec<(String, bool)> = clause
                        .into_iter()
                        .map(|(id, negated)| (format!("x{id}"), negated))
                        .collect();
                    formula.add_clause(names.iter().map(|(name, negated)| (name.as_str(), *negated)));
                }
                formula
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    fn formula(s: &str) -> Formula {
        s.parse().unwrap()
    }

    fn var(f: &Formula, name: &str) -> VarId {
        f.variables().get(name).unwrap()
    }

    #[test]
    fn test_display() {
        let mut f = formula("{{a, -b}, {c, -a}, {b, -b}}");
        insta::assert_snapshot!(f.to_string(), @"{{a,-b},{c,-a},{b,-b}}");

        f.prune();
        insta::assert_snapshot!(f.to_string(), @"{{a,-b},{c,-a},⊤}");

        f.clean();
        let a = var(&f, "a");
        f.propagate(a, false).unwrap();
        insta::assert_snapshot!(f.to_string(), @"{{False,-b},{c,True}}");

        f.clean();
        insta::assert_snapshot!(f.to_string(), @"{{-b},{c,True}}");

        f.check_values();
        f.clean();
        insta::assert_snapshot!(f.to_string(), @"{{-b}}");

        f.propagate_units().unwrap();
        f.check_values();
        f.clean();
        insta::assert_snapshot!(f.to_string(), @"⊤");
    }

    #[test]
    fn test_unit_conflict() {
        let mut f = formula("{{a}, {b, c}, {-a}}");
        let conflict = f.propagate_units().unwrap_err();
        assert_eq!(conflict.var, var(&f, "a"));
        // The first unit is kept, the conflicting one is not applied
        assert_eq!(f.values().value(var(&f, "a")), Some(true));
        assert_eq!(f.trail().collect::<Vec<_>>(), vec![("a", true)]);
    }

    #[test]
    fn test_select() {
        let f = formula("{}");
        assert_eq!(f.select(), Either::Left(Terminal::Satisfied));

        let mut f = formula("{{a, b}, {-a}, {-b}}");
        f.propagate_units().unwrap();
        f.clean();
        assert_eq!(f.select(), Either::Left(Terminal::Falsified));

        let mut f = formula("{{a, b}, {c}}");
        f.clause_mut(ClauseId(0)).always_true = true;
        assert_eq!(f.select(), Either::Right(ClauseId(1)));
    }

    #[test]
    fn test_decide_and_flip() {
        let mut f = formula("{{-a, b}}");
        let a = var(&f, "a");

        assert_eq!(f.decide(ClauseId(0)), Ok((a, false)));
        assert_eq!(f.depth(), 1);
        f.clean();
        f.check_values();
        f.clean();
        assert_eq!(f.num_clauses(), 0);

        // The false branch of `-a` sets `a`
        assert_eq!(f.flip(), Some((a, true)));
        assert_eq!(f.num_clauses(), 1);
        assert_eq!(f.trail().collect::<Vec<_>>(), vec![("a", true)]);
        assert_eq!(f.depth(), 1);

        // Both branches are consumed
        assert_eq!(f.flip(), None);
        assert_eq!(f.depth(), 0);
    }

    #[test]
    fn test_restore_is_total() {
        let mut f = formula("{{a, b}, {-a, c}, {-c, d}, {b, -d, e}}");
        f.prune();
        f.clean();
        let before = f.clone();

        let Either::Right(clause) = f.select() else {
            panic!("Expected a clause to branch on");
        };
        f.decide(clause).unwrap();
        f.clean();
        while f.propagate_units().unwrap() > 0 {
            f.clean();
        }
        f.check_values();
        f.clean();
        assert_ne!(f.clauses, before.clauses);

        let checkpoint = f.frames.top().unwrap().checkpoint;
        f.restore(checkpoint);
        assert_eq!(f.clauses, before.clauses);
        assert_eq!(f.values, before.values);
        assert_eq!(f.trail, before.trail);
        assert_eq!(f.undo, before.undo);
    }

    #[test]
    fn test_model_defaults_to_false() {
        let mut f = formula("{{a, b}, {c}}");
        f.propagate_units().unwrap();
        assert_eq!(
            f.model(),
            btreemap! {
                "a".to_string() => false,
                "b".to_string() => false,
                "c".to_string() => true,
            }
        );
    }

    proptest! {
        #[test]
        fn test_clean_is_idempotent(mut f in any::<Formula>()) {
            f.prune();
            // Conflicts are irrelevant here, only some assignment is needed
            let _ = f.propagate_units();
            f.clean();
            let once = f.clone();
            f.clean();
            prop_assert_eq!(f, once);
        }
    }

    impl Formula {
        fn clause_mut(&mut self, id: ClauseId) -> &mut Clause {
            &mut self.clauses[id.0]
        }
    }
}
