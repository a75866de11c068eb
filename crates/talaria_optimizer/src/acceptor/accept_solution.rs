use crate::{problem::travel_cost_matrix::Cost, solver::solution::solution_memory::SolutionMemory};

pub struct AcceptSolutionContext {
    pub iteration: usize,
    pub max_iterations: Option<usize>,
}

pub trait AcceptSolution {
    /// Whether a candidate of cost `cost` should join the memory.
    fn accept(&self, memory: &SolutionMemory, cost: Cost, context: AcceptSolutionContext) -> bool;
}
