use rand::{Rng, seq::IndexedRandom};

use crate::solver::{accepted_solution::AcceptedSolution, solution::solution_memory::SolutionMemory};

use super::select_solution::SelectSolution;

pub struct SelectRandomSelector;

impl SelectSolution for SelectRandomSelector {
    fn select_solution<'a>(
        &self,
        memory: &'a SolutionMemory,
        rng: &mut impl Rng,
    ) -> Option<&'a AcceptedSolution> {
        memory.solutions().choose(rng)
    }
}
