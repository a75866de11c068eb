use crate::{problem::travel_cost_matrix::Cost, solver::solution::solution_memory::SolutionMemory};

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Accepts while the memory has room, then only candidates beating the worst remembered one.
pub struct GreedySolutionAcceptor;

impl AcceptSolution for GreedySolutionAcceptor {
    fn accept(&self, memory: &SolutionMemory, cost: Cost, _: AcceptSolutionContext) -> bool {
        match memory.worst_cost() {
            Some(worst_cost) if memory.is_full() => cost < worst_cost,
            _ => true,
        }
    }
}
