use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use flipsat::*;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Parser)]
#[command(version, about = "Chronological backtracking SAT solver")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a formula, e.g. `flipsat solve '{{-a, b}, {-v, r, q}}'`
    Solve {
        /// Formula in brace notation, joined with spaces
        formula: Vec<String>,
        /// Print the formula after each step of the search
        #[clap(long)]
        verbose: bool,
        /// Read a DIMACS CNF file instead
        #[clap(long, conflicts_with = "formula")]
        dimacs: Option<PathBuf>,
    },
    /// Solve the doubling family for increasing sizes
    Bench {
        #[clap(long, default_value_t = 1)]
        min: usize,
        #[clap(long, default_value_t = 10)]
        max: usize,
        /// Skip larger sizes once a run takes longer than this
        #[clap(long, default_value_t = 10)]
        budget_secs: u64,
        /// Print the report as JSON to stdout
        #[clap(long)]
        json: bool,
    },
}

fn solve(formula: Formula, verbose: bool) -> Result<()> {
    eprintln!("{:>12} {}", "Solving".bold().blue(), formula);
    let mut solver = Solver::new(formula);
    if verbose {
        solver = solver.observe(|step, formula| {
            eprintln!("{:>12} {}", step.to_string().bold().cyan(), formula);
        });
    }
    let solution = solver.solve();
    log::info!("{:?}", solver.stats());

    match solution {
        Solution::Sat(model) => {
            println!("{}", "SATISFIABLE".bold().green());
            for (name, value) in model {
                println!("{name} = {value}");
            }
        }
        Solution::UnSat => println!("{}", "UNSATISFIABLE".bold().red()),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    match args.command {
        Command::Solve {
            formula,
            verbose,
            dimacs,
        } => {
            let formula = if let Some(path) = dimacs {
                let input = std::fs::read_to_string(&path)
                    .with_context(|| format!("Cannot read {}", path.display()))?;
                parse_dimacs(&input)?
            } else {
                if formula.is_empty() {
                    bail!("No formula given");
                }
                parse(&formula.join(" "))?
            };
            solve(formula, verbose)
        }
        Command::Bench {
            min,
            max,
            budget_secs,
            json,
        } => {
            if min > max {
                bail!("Empty range: --min {min} is larger than --max {max}");
            }
            let report = benchmark(Settings {
                min,
                max,
                budget: Duration::from_secs(budget_secs),
            });
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Ok(())
        }
    }
}
