use rand::{Rng, seq::SliceRandom};

use crate::{problem::job::JobIdx, solver::solution::working_solution::WorkingSolution};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes jobs drawn uniformly among every assigned job.
pub struct RuinRandom;

impl RuinSolution for RuinRandom {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let mut candidates = context.removable_jobs(solution);
        let num_jobs_to_remove = context.num_jobs_to_remove.min(candidates.len());

        let (chosen, _) = candidates.partial_shuffle(context.rng, num_jobs_to_remove);
        let chosen = chosen.to_vec();

        for &job_id in &chosen {
            context.remove_job(solution, job_id);
        }

        chosen
    }
}
