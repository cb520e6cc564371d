use super::VarId;
use proptest::prelude::*;
use std::{fmt, ops::Not};

/// A reference to a propositional variable with a polarity
///
/// The literal itself does not carry the truth value of the variable.
/// It is looked up in an [Assignment] by [VarId], so every literal over the
/// same variable observes the same value regardless of its polarity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub var: VarId,
    pub negated: bool,
}

impl Literal {
    pub fn new(var: VarId, negated: bool) -> Self {
        Self { var, negated }
    }

    /// Same variable, opposite polarity
    pub fn is_negation_of(&self, other: &Literal) -> bool {
        self.var == other.var && self.negated != other.negated
    }

    /// `variable_value XOR negated`, or `None` while the variable is unassigned
    pub fn resolved_value(&self, values: &Assignment) -> Option<bool> {
        values.value(self.var).map(|value| value ^ self.negated)
    }

    /// Value of the underlying variable which makes this literal resolve to `target`
    pub fn value_for(&self, target: bool) -> bool {
        target ^ self.negated
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self {
            negated: !self.negated,
            ..self
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.negated {
            write!(f, "-{:?}", self.var)
        } else {
            write!(f, "{:?}", self.var)
        }
    }
}

impl Arbitrary for Literal {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0..8u32, any::<bool>())
            .prop_map(|(var, negated)| Self::new(VarId::new(var), negated))
            .boxed()
    }
}

/// Raised when a variable is pushed towards the value opposite to the one it already has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub var: VarId,
}

/// Tri-state values of the underlying variables, indexed by [VarId]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    pub fn new(num_variables: usize) -> Self {
        Self(vec![None; num_variables])
    }

    /// Make room for variables interned after construction
    pub fn grow(&mut self, num_variables: usize) {
        if self.0.len() < num_variables {
            self.0.resize(num_variables, None);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn value(&self, var: VarId) -> Option<bool> {
        self.0[var.index()]
    }

    /// Set the value unconditionally and return the previous one
    pub fn assign(&mut self, var: VarId, value: bool) -> Option<bool> {
        self.0[var.index()].replace(value)
    }

    pub fn unassign(&mut self, var: VarId) {
        self.0[var.index()] = None;
    }

    /// Adopt an incoming value for `var`
    ///
    /// Returns `Ok(true)` if the variable was unassigned and now holds
    /// `value`, `Ok(false)` if it already held `value`. A variable holding
    /// the opposite value is left untouched and a [Conflict] is returned.
    ///
    /// ```rust
    /// use flipsat::{Assignment, Formula};
    ///
    /// let formula: Formula = "{{a}}".parse().unwrap();
    /// let a = formula.variables().get("a").unwrap();
    ///
    /// let mut values = Assignment::new(1);
    /// assert_eq!(values.propagate_from(a, true), Ok(true));
    /// assert_eq!(values.propagate_from(a, true), Ok(false));
    /// assert!(values.propagate_from(a, false).is_err());
    /// assert_eq!(values.value(a), Some(true));
    /// ```
    pub fn propagate_from(&mut self, var: VarId, value: bool) -> Result<bool, Conflict> {
        match self.0[var.index()] {
            Some(current) if current != value => Err(Conflict { var }),
            Some(_) => Ok(false),
            None => {
                self.0[var.index()] = Some(value);
                Ok(true)
            }
        }
    }
}
