use rand::Rng;

use crate::solver::{accepted_solution::AcceptedSolution, solution::solution_memory::SolutionMemory};

pub trait SelectSolution {
    /// Base solution of the next iteration, `None` when the memory is empty.
    fn select_solution<'a>(
        &self,
        memory: &'a SolutionMemory,
        rng: &mut impl Rng,
    ) -> Option<&'a AcceptedSolution>;
}
