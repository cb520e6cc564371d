use crate::{doubling_family, Solver, Stats};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Sizes of the doubling family to run
///
/// Once a run takes longer than `budget`, larger sizes are skipped. A run
/// in progress is never interrupted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub min: usize,
    pub max: usize,
    pub budget: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min: 1,
            max: 10,
            budget: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub n: usize,
    pub clauses: usize,
    pub satisfiable: bool,
    pub elapsed: Duration,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub settings: Settings,
    pub runs: Vec<Run>,
    pub skipped: Vec<usize>,
}

pub fn benchmark(settings: Settings) -> Report {
    let mut runs: Vec<Run> = Vec::new();
    let mut skipped = Vec::new();

    eprintln!(
        "{:>12} doubling family, n = {}..={} [budget = {:?}]",
        "Benchmark".bold().magenta(),
        settings.min,
        settings.max,
        settings.budget
    );
    for n in settings.min..=settings.max {
        if runs.last().is_some_and(|run| run.elapsed > settings.budget) {
            eprintln!("{:>12} n = {n}", "Skipped".bold().yellow());
            skipped.push(n);
            continue;
        }

        let formula = doubling_family(n);
        let clauses = formula.num_clauses();
        eprintln!("{:>12} n = {n} ({clauses} clauses)", "Solving".bold().blue());

        let mut solver = Solver::new(formula);
        let start = Instant::now();
        let solution = solver.solve();
        let elapsed = start.elapsed();

        let satisfiable = solution.is_sat();
        if satisfiable {
            // The family has no model, this is a bug of the solver
            eprintln!("{:>12} n = {n} (in {elapsed:?})", "SAT".bold().red());
        } else {
            eprintln!("{:>12} n = {n} (in {elapsed:?})", "UNSAT".bold().green());
        }
        runs.push(Run {
            n,
            clauses,
            satisfiable,
            elapsed,
            stats: solver.stats(),
        });
    }

    Report {
        settings,
        runs,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark() {
        let report = benchmark(Settings {
            min: 1,
            max: 4,
            budget: Duration::from_secs(3600),
        });
        assert!(report.skipped.is_empty());
        assert_eq!(
            report.runs.iter().map(|run| run.n).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        for run in &report.runs {
            assert!(!run.satisfiable);
            assert_eq!(run.clauses, 1 << run.n);
        }
    }

    #[test]
    fn test_budget() {
        // Every run exceeds a zero budget, except possibly on a coarse clock
        let report = benchmark(Settings {
            min: 2,
            max: 5,
            budget: Duration::ZERO,
        });
        assert!(!report.runs.is_empty());
        assert_eq!(report.runs.len() + report.skipped.len(), 4);
        assert_eq!(report.runs[0].n, 2);
    }

    #[test]
    fn test_report_json() {
        let report = benchmark(Settings {
            min: 1,
            max: 1,
            budget: Duration::from_secs(1),
        });
        let json = serde_json::to_string(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
