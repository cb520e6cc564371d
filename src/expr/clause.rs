use super::{Assignment, Literal, VarId};
use proptest::prelude::*;
use std::collections::HashMap;

/// A disjunction of literals
///
/// The order of literals is kept as given since the first literal is the
/// one branched on, and a clause is never sorted or deduplicated.
///
/// - An `always_true` clause is satisfied for good and ignored by the search.
/// - A clause without literals is falsified, i.e. a conflict.
/// - A clause with exactly one literal is a unit clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub(crate) literals: Vec<Literal>,
    pub(crate) always_true: bool,
    /// Dropped from the formula by the clean step
    pub(crate) removed: bool,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self {
            literals,
            always_true: false,
            removed: false,
        }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Number of literals in the clause
    pub fn num_literals(&self) -> usize {
        self.literals.len()
    }

    pub fn is_always_true(&self) -> bool {
        self.always_true
    }

    pub fn is_falsified(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn as_unit(&self) -> Option<Literal> {
        if self.is_unit() {
            self.literals.first().copied()
        } else {
            None
        }
    }

    /// Satisfied for good when some literal appears together with its negation.
    ///
    /// Returns `true` if the flag has been set by this call.
    pub fn mark_tautology_if_present(&mut self) -> bool {
        if self.always_true {
            return false;
        }
        let mut polarity: HashMap<VarId, bool> = HashMap::new();
        let found = self
            .literals
            .iter()
            .any(|lit| *polarity.entry(lit.var).or_insert(lit.negated) != lit.negated);
        self.always_true = found;
        found
    }

    /// Remove literals resolving to false, keeping true and unassigned ones.
    ///
    /// Returns the previous literals if anything has been removed.
    pub fn drop_falsified_literals(&mut self, values: &Assignment) -> Option<Vec<Literal>> {
        let falsified = |lit: &Literal| lit.resolved_value(values) == Some(false);
        if !self.literals.iter().any(falsified) {
            return None;
        }
        let prior = self.literals.clone();
        self.literals.retain(|lit| !falsified(lit));
        Some(prior)
    }

    /// Returns `true` if the flag has been set by this call.
    pub fn mark_satisfied_if_any_true(&mut self, values: &Assignment) -> bool {
        if self.always_true {
            return false;
        }
        self.always_true = self
            .literals
            .iter()
            .any(|lit| lit.resolved_value(values) == Some(true));
        self.always_true
    }

    /// The assignment making the sole literal of a unit clause true
    pub fn force_unit_true(&self) -> Option<(VarId, bool)> {
        self.as_unit().map(|lit| (lit.var, lit.value_for(true)))
    }

    /// The assignment making the first literal resolve to `target`
    pub fn branch_first_literal(&self, target: bool) -> Option<(VarId, bool)> {
        self.literals
            .first()
            .map(|lit| (lit.var, lit.value_for(target)))
    }
}

impl Arbitrary for Clause {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        proptest::collection::vec(any::<Literal>(), 1..5)
            .prop_map(Clause::new)
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(var: u32, negated: bool) -> Literal {
        Literal::new(VarId::new(var), negated)
    }

    #[test]
    fn test_tautology() {
        let mut c = Clause::new(vec![lit(0, false), lit(1, false), lit(0, true)]);
        assert!(c.mark_tautology_if_present());
        assert!(c.is_always_true());
        // Already marked
        assert!(!c.mark_tautology_if_present());

        // Duplicated literal is not a tautology
        let mut c = Clause::new(vec![lit(0, false), lit(0, false)]);
        assert!(!c.mark_tautology_if_present());
        assert!(!c.is_always_true());
    }

    #[test]
    fn test_drop_falsified_literals() {
        let mut values = Assignment::new(3);
        values.assign(VarId::new(0), true);
        values.assign(VarId::new(1), true);

        // x0 is true, ¬x1 is false, x2 is unassigned
        let mut c = Clause::new(vec![lit(0, false), lit(1, true), lit(2, false)]);
        let prior = c.drop_falsified_literals(&values).unwrap();
        assert_eq!(prior.len(), 3);
        assert_eq!(c.literals(), &[lit(0, false), lit(2, false)]);
        assert!(c.drop_falsified_literals(&values).is_none());

        // Every literal is false
        let mut c = Clause::new(vec![lit(0, true), lit(1, true)]);
        c.drop_falsified_literals(&values).unwrap();
        assert!(c.is_falsified());
    }

    #[test]
    fn test_mark_satisfied() {
        let mut values = Assignment::new(2);
        let mut c = Clause::new(vec![lit(0, false), lit(1, true)]);
        assert!(!c.mark_satisfied_if_any_true(&values));

        values.assign(VarId::new(1), false);
        assert!(c.mark_satisfied_if_any_true(&values));
        assert!(c.is_always_true());
    }

    #[test]
    fn test_force_unit_true() {
        assert_eq!(
            Clause::new(vec![lit(3, true)]).force_unit_true(),
            Some((VarId::new(3), false))
        );
        assert_eq!(
            Clause::new(vec![lit(3, false)]).force_unit_true(),
            Some((VarId::new(3), true))
        );
        assert_eq!(
            Clause::new(vec![lit(3, false), lit(4, false)]).force_unit_true(),
            None
        );
    }

    #[test]
    fn test_branch_first_literal() {
        let c = Clause::new(vec![lit(1, true), lit(0, false)]);
        assert_eq!(c.branch_first_literal(true), Some((VarId::new(1), false)));
        assert_eq!(c.branch_first_literal(false), Some((VarId::new(1), true)));
        assert_eq!(Clause::new(vec![]).branch_first_literal(true), None);
    }

    proptest! {
        #[test]
        fn test_drop_is_idempotent(mut c in any::<Clause>(), assigned in proptest::collection::vec(any::<Option<bool>>(), 8)) {
            let mut values = Assignment::new(8);
            for (i, value) in assigned.into_iter().enumerate() {
                if let Some(value) = value {
                    values.assign(VarId::new(i as u32), value);
                }
            }
            c.drop_falsified_literals(&values);
            let once = c.clone();
            prop_assert!(c.drop_falsified_literals(&values).is_none());
            prop_assert_eq!(c, once);
        }

        #[test]
        fn test_tautology_iff_negation_pair(mut c in any::<Clause>()) {
            let expected = c
                .literals()
                .iter()
                .any(|a| c.literals().iter().any(|b| a.is_negation_of(b)));
            c.mark_tautology_if_present();
            prop_assert_eq!(c.is_always_true(), expected);
        }
    }
}
