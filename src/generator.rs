use crate::Formula;

/// Every sign combination of `n` variables, one clause each
///
/// Clause `k` contains `x1..xn` in order, with `xi` negated iff the bit
/// `i - 1` of `k` is set. Any assignment falsifies exactly the clause of
/// its own negation, so the formula is unsatisfiable for every `n ≥ 1`.
/// It has `2^n` clauses, which makes it a scaling benchmark for the search.
///
/// ```rust
/// use flipsat::doubling_family;
///
/// assert_eq!(
///     doubling_family(2).to_string(),
///     "{{x1,x2},{-x1,x2},{x1,-x2},{-x1,-x2}}"
/// );
/// ```
pub fn doubling_family(n: usize) -> Formula {
    assert!(n < usize::BITS as usize, "Too many variables: {n}");
    let names: Vec<String> = (1..=n).map(|i| format!("x{i}")).collect();
    let mut formula = Formula::new();
    for k in 0..(1usize << n) {
        formula.add_clause(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.as_str(), k >> i & 1 == 1)),
        );
    }
    formula
}
