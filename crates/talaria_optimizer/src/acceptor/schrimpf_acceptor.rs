use crate::{problem::travel_cost_matrix::Cost, solver::solution::solution_memory::SolutionMemory};

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Threshold accepting: a candidate joins a full memory when it is cheaper than the worst
/// remembered solution plus a threshold halving every `alpha` of the search.
///
/// Schrimpf et al., "Record Breaking Optimization Results Using the Ruin and Recreate Principle".
pub struct SchrimpfAcceptor {
    initial_threshold: f64,
    alpha: f64,
}

impl SchrimpfAcceptor {
    pub fn new(initial_threshold: f64, alpha: f64) -> Self {
        SchrimpfAcceptor {
            initial_threshold,
            alpha,
        }
    }

    pub fn initial_threshold(&self) -> f64 {
        self.initial_threshold
    }

    /// Without an iteration limit the progress of the search is unknown and the threshold
    /// stays at its initial value.
    pub fn threshold(&self, iteration: usize, max_iterations: Option<usize>) -> f64 {
        let progress = match max_iterations {
            Some(max_iterations) if max_iterations > 0 => iteration as f64 / max_iterations as f64,
            _ => 0.0,
        };

        self.initial_threshold * (-std::f64::consts::LN_2 * progress / self.alpha).exp()
    }
}

impl AcceptSolution for SchrimpfAcceptor {
    fn accept(&self, memory: &SolutionMemory, cost: Cost, context: AcceptSolutionContext) -> bool {
        match memory.worst_cost() {
            Some(worst_cost) if memory.is_full() => {
                cost < worst_cost + self.threshold(context.iteration, context.max_iterations)
            }
            _ => true,
        }
    }
}
