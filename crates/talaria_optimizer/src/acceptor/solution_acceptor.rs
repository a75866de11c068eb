use crate::{problem::travel_cost_matrix::Cost, solver::solution::solution_memory::SolutionMemory};

use super::{
    accept_solution::{AcceptSolution, AcceptSolutionContext},
    greedy_solution_acceptor::GreedySolutionAcceptor,
    schrimpf_acceptor::SchrimpfAcceptor,
};

pub enum SolutionAcceptor {
    Greedy(GreedySolutionAcceptor),
    Schrimpf(SchrimpfAcceptor),
    Any,
}

impl AcceptSolution for SolutionAcceptor {
    fn accept(&self, memory: &SolutionMemory, cost: Cost, context: AcceptSolutionContext) -> bool {
        match self {
            SolutionAcceptor::Greedy(acceptor) => acceptor.accept(memory, cost, context),
            SolutionAcceptor::Schrimpf(acceptor) => acceptor.accept(memory, cost, context),
            SolutionAcceptor::Any => true,
        }
    }
}
