use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use jiff::SignedDuration;
use talaria_optimizer::solver::{
    recreate::recreate_strategy::RecreateStrategy, solver_params::SolverParams,
    solver_params::Threads, termination::termination::Termination,
};

use crate::parsers;

/// Search options shared by the commands. Flags override the configuration file.
#[derive(Args, Clone)]
pub struct SearchArgs {
    /// JSON file with solver parameters
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, short = 'n')]
    iterations: Option<usize>,

    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Number of solutions kept in memory
    #[arg(long)]
    memory: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Threads evaluating insertions, 0 uses every core
    #[arg(long)]
    threads: Option<usize>,

    /// Insertion used by every strategy: best, best:<order>, regret or regret:<k>
    #[arg(long, value_parser = parsers::parse_insertion)]
    insertion: Option<RecreateStrategy>,
}

impl SearchArgs {
    pub fn solver_params(&self) -> anyhow::Result<SolverParams> {
        let mut params = match &self.config {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str::<SolverParams>(&content)
                    .with_context(|| format!("Invalid solver parameters in {}", path.display()))?
            }
            None => SolverParams::default(),
        };

        let mut overrides = Vec::new();
        if let Some(iterations) = self.iterations {
            overrides.push(Termination::Iterations(iterations));
        }
        if let Some(time_limit_ms) = self.time_limit_ms {
            overrides.push(Termination::Duration(SignedDuration::from_millis(
                time_limit_ms as i64,
            )));
        }
        if !overrides.is_empty() {
            params.terminations.retain(|termination| {
                !matches!(
                    termination,
                    Termination::Iterations(_) | Termination::Duration(_)
                )
            });
            params.terminations.extend(overrides);
        }

        if let Some(memory) = self.memory {
            params.max_solutions = memory;
        }
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if let Some(threads) = self.threads {
            params.insertion_threads = match threads {
                0 => Threads::Auto,
                1 => Threads::Single,
                n => Threads::Multi(n),
            };
        }
        if let Some(insertion) = self.insertion {
            params.construction = insertion;
            for strategy in &mut params.strategies {
                strategy.recreate = insertion;
            }
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        search: SearchArgs,
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "talaria",
            "--iterations",
            "50",
            "--time-limit-ms",
            "1500",
            "--memory",
            "3",
            "--seed",
            "7",
            "--threads",
            "4",
            "--insertion",
            "regret:3",
        ]);
        let params = cli.search.solver_params().unwrap();

        assert_eq!(
            params.terminations,
            vec![
                Termination::Iterations(50),
                Termination::Duration(SignedDuration::from_millis(1500))
            ]
        );
        assert_eq!(params.max_solutions, 3);
        assert_eq!(params.seed, 7);
        assert_eq!(params.insertion_threads.number_of_threads(), 4);
        assert_eq!(params.construction, RecreateStrategy::RegretInsertion(3));
        assert!(
            params
                .strategies
                .iter()
                .all(|strategy| strategy.recreate == RecreateStrategy::RegretInsertion(3))
        );
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = TestCli::parse_from(["talaria"]);
        let params = cli.search.solver_params().unwrap();

        assert_eq!(params.terminations, SolverParams::default().terminations);
    }

    #[test]
    fn test_time_limit_replaces_configured_duration() {
        let config = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/solver_params.json");
        let cli = TestCli::parse_from(["talaria", "--config", config, "--time-limit-ms", "200"]);
        let params = cli.search.solver_params().unwrap();

        assert_eq!(
            params.terminations,
            vec![
                Termination::VariationCoefficient {
                    iterations: 200,
                    threshold: 0.001
                },
                Termination::Duration(SignedDuration::from_millis(200))
            ]
        );
        assert_eq!(params.max_solutions, 5);
        assert_eq!(params.strategies.len(), 3);
        assert!(params.adaptive.is_some());
    }
}
