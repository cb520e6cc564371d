use crate::{Formula, Model};

/// Try every assignment until one satisfies the formula
///
/// Variables are fixed in the order they appear, `true` before `false`.
/// This takes `2^n` evaluations in the worst case and is only meant as a
/// reference for the search.
pub fn brute_force(formula: &Formula) -> Option<Model> {
    let names: Vec<&str> = formula.variables().iter().map(|(_, name)| name).collect();
    let mut model = Model::new();
    if fix(formula, &names, &mut model) {
        Some(model)
    } else {
        None
    }
}

fn fix(formula: &Formula, names: &[&str], model: &mut Model) -> bool {
    let Some((name, rest)) = names.split_first() else {
        return formula.evaluate(model);
    };
    for value in [true, false] {
        log::trace!("Set {} = {}", name, value);
        model.insert(name.to_string(), value);
        if fix(formula, rest, model) {
            return true;
        }
    }
    model.remove(*name);
    false
}
