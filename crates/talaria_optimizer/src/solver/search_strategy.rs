use std::fmt::Display;

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    recreate::{best_insertion::BestInsertionSortStrategy, recreate_strategy::RecreateStrategy},
    ruin::ruin_strategy::RuinStrategy,
    solver_error::SolverError,
};

/// A ruin followed by a recreate, picked with a probability proportional to its weight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchStrategy {
    pub ruin: RuinStrategy,
    pub recreate: RecreateStrategy,
    pub weight: f64,
}

impl SearchStrategy {
    pub fn new(ruin: RuinStrategy, recreate: RecreateStrategy, weight: f64) -> Self {
        SearchStrategy {
            ruin,
            recreate,
            weight,
        }
    }

    pub fn default_strategies() -> Vec<SearchStrategy> {
        let recreate = RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Random);
        vec![
            SearchStrategy::new(RuinStrategy::Random, recreate, 50.0),
            SearchStrategy::new(RuinStrategy::Worst, recreate, 50.0),
            SearchStrategy::new(RuinStrategy::Radial, recreate, 200.0),
        ]
    }
}

impl Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.ruin, self.recreate)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AdaptiveWeightsParams {
    pub segment_iterations: usize,
    /// Share of the segment score in the new weight, within [0, 1].
    pub reaction_factor: f64,
    pub best_score: f64,
    pub improved_score: f64,
    pub accepted_score: f64,
}

impl Default for AdaptiveWeightsParams {
    fn default() -> Self {
        AdaptiveWeightsParams {
            segment_iterations: 50,
            reaction_factor: 0.3,
            best_score: 33.0,
            improved_score: 9.0,
            accepted_score: 3.0,
        }
    }
}

/// What a strategy achieved during one iteration.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrategyOutcome {
    pub is_best: bool,
    pub improved: bool,
    pub accepted: bool,
}

impl StrategyOutcome {
    /// A new best, or an accepted candidate cheaper than the solution it was built from.
    pub fn is_improvement(&self) -> bool {
        self.is_best || (self.accepted && self.improved)
    }
}

#[derive(Clone, Debug, Default)]
struct SegmentScore {
    score: f64,
    iterations: usize,
}

const MIN_WEIGHT: f64 = 0.1;

/// Selection weights of the strategies, optionally adapted every segment from the outcomes of
/// the strategies.
#[derive(Clone, Debug)]
pub struct StrategyWeights {
    strategies: Vec<SearchStrategy>,
    weights: Vec<f64>,
    scores: Vec<SegmentScore>,
    adaptive: Option<AdaptiveWeightsParams>,
}

impl StrategyWeights {
    pub fn new(
        strategies: Vec<SearchStrategy>,
        adaptive: Option<AdaptiveWeightsParams>,
    ) -> Result<Self, SolverError> {
        if strategies.is_empty() {
            return Err(SolverError::NoStrategy);
        }

        if let Some(invalid) = strategies
            .iter()
            .map(|strategy| strategy.weight)
            .find(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(SolverError::InvalidWeight(invalid));
        }

        if strategies.iter().all(|strategy| strategy.weight == 0.0) {
            return Err(SolverError::InvalidWeight(0.0));
        }

        if let Some(params) = &adaptive
            && !(0.0..=1.0).contains(&params.reaction_factor)
        {
            return Err(SolverError::InvalidProbability(params.reaction_factor));
        }

        Ok(StrategyWeights {
            weights: strategies.iter().map(|strategy| strategy.weight).collect(),
            scores: vec![SegmentScore::default(); strategies.len()],
            strategies,
            adaptive,
        })
    }

    pub fn strategy(&self, index: usize) -> &SearchStrategy {
        &self.strategies[index]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Index of a strategy drawn proportionally to the weights.
    pub fn select<R>(&self, rng: &mut R) -> usize
    where
        R: Rng,
    {
        let indices = (0..self.strategies.len()).collect::<Vec<_>>();
        indices
            .choose_weighted(rng, |&index| self.weights[index])
            .copied()
            .unwrap_or(0)
    }

    pub fn record(&mut self, index: usize, outcome: StrategyOutcome) {
        let Some(params) = &self.adaptive else {
            return;
        };

        let score = if outcome.is_best {
            params.best_score
        } else if outcome.improved {
            params.improved_score
        } else if outcome.accepted {
            params.accepted_score
        } else {
            0.0
        };

        let entry = &mut self.scores[index];
        entry.score += score;
        entry.iterations += 1;
    }

    /// Folds the segment scores into the weights at the end of every segment.
    pub fn end_iteration(&mut self, iteration: usize) {
        let Some(params) = &self.adaptive else {
            return;
        };

        if params.segment_iterations == 0 || (iteration + 1) % params.segment_iterations != 0 {
            return;
        }

        let reaction_factor = params.reaction_factor;
        for (weight, entry) in self.weights.iter_mut().zip(&mut self.scores) {
            let segment_weight = if entry.iterations == 0 {
                0.0
            } else {
                entry.score / entry.iterations as f64
            };

            *weight = ((1.0 - reaction_factor) * *weight + reaction_factor * segment_weight)
                .max(MIN_WEIGHT);
            *entry = SegmentScore::default();
        }

        debug!(weights = ?self.weights, "Updated strategy weights");
    }
}
