use rand::Rng;

use crate::solver::{accepted_solution::AcceptedSolution, solution::solution_memory::SolutionMemory};

use super::{
    select_best_selector::SelectBestSelector, select_random_selector::SelectRandomSelector,
    select_solution::SelectSolution,
};

pub enum SolutionSelector {
    SelectBest(SelectBestSelector),
    SelectRandom(SelectRandomSelector),
}

impl SelectSolution for SolutionSelector {
    fn select_solution<'a>(
        &self,
        memory: &'a SolutionMemory,
        rng: &mut impl Rng,
    ) -> Option<&'a AcceptedSolution> {
        match self {
            SolutionSelector::SelectBest(selector) => selector.select_solution(memory, rng),
            SolutionSelector::SelectRandom(selector) => selector.select_solution(memory, rng),
        }
    }
}
