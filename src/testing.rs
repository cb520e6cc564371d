use crate::Solution;
use maplit::btreemap;

/// Formulas with the model the search must find
///
/// Variables not constrained by any forced or decided assignment are `false`.
pub fn single_solution_cases() -> Vec<(&'static str, Solution)> {
    vec![
        // No clauses
        ("{}", Solution::Sat(btreemap! {})),
        // a
        ("{{a}}", Solution::Sat(btreemap! { "a".into() => true })),
        // ¬a
        ("{{-a}}", Solution::Sat(btreemap! { "a".into() => false })),
        // a ∧ b
        (
            "{{a},{b}}",
            Solution::Sat(btreemap! { "a".into() => true, "b".into() => true }),
        ),
        // a ∧ ¬b
        (
            "{{a},{-b}}",
            Solution::Sat(btreemap! { "a".into() => true, "b".into() => false }),
        ),
        // a ∨ ¬a, dropped as a tautology before anything is assigned
        ("{{a,-a}}", Solution::Sat(btreemap! { "a".into() => false })),
        // a ∧ (¬a ∨ b)
        (
            "{{a},{-a,b}}",
            Solution::Sat(btreemap! { "a".into() => true, "b".into() => true }),
        ),
        // a ∨ b, decided on a
        (
            "{{a,b}}",
            Solution::Sat(btreemap! { "a".into() => true, "b".into() => false }),
        ),
        // (¬a ∨ b) ∧ (¬b ∨ c), decided on a and then b
        (
            "{{-a,b},{-b,c}}",
            Solution::Sat(btreemap! {
                "a".into() => false,
                "b".into() => false,
                "c".into() => false,
            }),
        ),
        // a ∧ ¬a
        ("{{a},{-a}}", Solution::UnSat),
        // (a ∨ b) ∧ ¬a ∧ ¬b
        ("{{a,b},{-a},{-b}}", Solution::UnSat),
        // From Knuth 4B (112)
        (
            "{{a,b,c,d},{a,-b},{-a,-b,-c},{-a,c},{b,-c},{c,-d}}",
            Solution::UnSat,
        ),
    ]
}
