use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

/// Stops the search as soon as one of the configured criteria holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Iterations(usize),
    /// Checked between iterations only, a running iteration always completes.
    Duration(SignedDuration),
    IterationsWithoutImprovement(usize),
    /// Coefficient of variation of the best cost over the last `iterations` iterations.
    VariationCoefficient { iterations: usize, threshold: f64 },
}

impl Termination {
    pub fn max_iterations(terminations: &[Termination]) -> Option<usize> {
        terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Iterations(max_iterations) => Some(*max_iterations),
                _ => None,
            })
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_format() {
        let terminations: Vec<Termination> = serde_json::from_str(
            r#"[
                {"iterations": 100},
                {"duration": "PT2S"},
                {"iterations_without_improvement": 20},
                {"variation_coefficient": {"iterations": 50, "threshold": 0.01}}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            terminations,
            vec![
                Termination::Iterations(100),
                Termination::Duration(SignedDuration::from_secs(2)),
                Termination::IterationsWithoutImprovement(20),
                Termination::VariationCoefficient {
                    iterations: 50,
                    threshold: 0.01
                },
            ]
        );
        assert_eq!(Termination::max_iterations(&terminations), Some(100));
    }
}
