use rand::Rng;

use crate::solver::{accepted_solution::AcceptedSolution, solution::solution_memory::SolutionMemory};

use super::select_solution::SelectSolution;

pub struct SelectBestSelector;

impl SelectSolution for SelectBestSelector {
    fn select_solution<'a>(
        &self,
        memory: &'a SolutionMemory,
        _: &mut impl Rng,
    ) -> Option<&'a AcceptedSolution> {
        memory.best()
    }
}
