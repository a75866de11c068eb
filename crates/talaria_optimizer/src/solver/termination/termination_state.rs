use jiff::{SignedDuration, Timestamp};

use crate::{problem::travel_cost_matrix::Cost, solver::search_strategy::StrategyOutcome};

use super::termination::Termination;

/// Per-run bookkeeping the termination criteria are evaluated against.
pub struct TerminationState {
    start: Timestamp,
    iteration: usize,
    iterations_without_improvement: usize,
    window: usize,
    /// Best costs of the last iterations, indexed by `iteration % len`.
    best_costs: Vec<Cost>,
}

impl TerminationState {
    pub fn new(terminations: &[Termination]) -> Self {
        let window = terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::VariationCoefficient { iterations, .. } => Some(*iterations),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        TerminationState {
            start: Timestamp::now(),
            iteration: 0,
            iterations_without_improvement: 0,
            window,
            best_costs: Vec::with_capacity(window),
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn iterations_without_improvement(&self) -> usize {
        self.iterations_without_improvement
    }

    pub fn elapsed(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.start)
    }

    /// Records a completed iteration. Any improvement resets the stagnation counter.
    pub fn complete_iteration(&mut self, best_cost: Cost, outcome: &StrategyOutcome) {
        if outcome.is_improvement() {
            self.iterations_without_improvement = 0;
        } else {
            self.iterations_without_improvement += 1;
        }

        if self.window > 0 {
            if self.best_costs.len() < self.window {
                self.best_costs.push(best_cost);
            } else {
                self.best_costs[self.iteration % self.window] = best_cost;
            }
        }

        self.iteration += 1;
    }

    fn variation_coefficient(&self, iterations: usize) -> Option<f64> {
        if iterations == 0 || self.iteration < iterations {
            return None;
        }

        // The cost of iteration `i` sits at `i % window`
        let window = self.window;
        let costs = (1..=iterations.min(window))
            .map(|offset| self.best_costs[(self.iteration + window - offset) % window])
            .collect::<Vec<_>>();

        let mean = costs.iter().sum::<f64>() / costs.len() as f64;
        if mean == 0.0 {
            return Some(0.0);
        }

        let variance =
            costs.iter().map(|cost| (cost - mean).powi(2)).sum::<f64>() / costs.len() as f64;

        Some(variance.sqrt() / mean.abs())
    }

    pub fn is_met(&self, termination: &Termination) -> bool {
        match *termination {
            Termination::Iterations(max_iterations) => self.iteration >= max_iterations,
            Termination::Duration(max_duration) => self.elapsed() >= max_duration,
            Termination::IterationsWithoutImprovement(max_iterations) => {
                self.iterations_without_improvement >= max_iterations
            }
            Termination::VariationCoefficient {
                iterations,
                threshold,
            } => self
                .variation_coefficient(iterations)
                .is_some_and(|coefficient| coefficient < threshold),
        }
    }

    /// Whether a time limit is reached, whatever the iteration count.
    pub fn is_out_of_time(&self, terminations: &[Termination]) -> bool {
        terminations.iter().any(|termination| {
            matches!(termination, Termination::Duration(_)) && self.is_met(termination)
        })
    }

    /// First criterion that holds, criteria combine with OR.
    pub fn should_terminate<'a>(&self, terminations: &'a [Termination]) -> Option<&'a Termination> {
        terminations
            .iter()
            .find(|termination| self.is_met(termination))
    }
}
