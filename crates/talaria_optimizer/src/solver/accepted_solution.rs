use crate::problem::travel_cost_matrix::Cost;

use super::{cost::cost_analysis::CostAnalysis, solution::working_solution::WorkingSolution};

/// A solution kept by the search, with the cost it was scored at.
#[derive(Clone)]
pub struct AcceptedSolution {
    pub solution: WorkingSolution,
    pub cost: Cost,
    pub cost_analysis: CostAnalysis,
}

impl AcceptedSolution {
    pub fn is_complete(&self) -> bool {
        !self.solution.has_unassigned()
    }
}
