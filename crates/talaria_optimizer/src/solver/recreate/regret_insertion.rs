use std::cmp::Ordering;

use tracing::trace;

use crate::solver::solution::working_solution::WorkingSolution;

use super::{
    job_insertions::JobInsertions, recreate_context::RecreateContext,
    recreate_solution::RecreateSolution,
};

/// Inserts first the job that would lose the most by waiting: the one with the largest gap
/// between its best insertion and its `k - 1` next best routes.
pub struct RegretInsertion {
    k: usize,
}

impl RegretInsertion {
    pub fn new(k: usize) -> Self {
        RegretInsertion { k: k.max(1) }
    }

    fn compare(&self, a: &JobInsertions, b: &JobInsertions) -> Ordering {
        a.regret(self.k)
            .total_cmp(&b.regret(self.k))
            .then(b.best_cost().total_cmp(&a.best_cost()))
            .then(b.job_id().cmp(&a.job_id()))
    }
}

impl RecreateSolution for RegretInsertion {
    fn recreate_solution(&self, solution: &mut WorkingSolution, context: &mut RecreateContext) {
        context.prepare(solution);

        let mut pending = solution
            .sorted_unassigned_jobs()
            .into_iter()
            .map(|job_id| context.evaluate_job(solution, job_id))
            .collect::<Vec<_>>();

        loop {
            let chosen = pending
                .iter()
                .enumerate()
                .filter(|(_, insertions)| insertions.best().is_some())
                .max_by(|(_, a), (_, b)| self.compare(a, b))
                .map(|(index, _)| index);

            let Some(index) = chosen else {
                break;
            };

            let insertions = pending.swap_remove(index);
            let Some(insertion) = insertions.best().cloned() else {
                break;
            };

            trace!(
                job = insertions.job_id().get(),
                regret = insertions.regret(self.k),
                "Regret insertion"
            );

            let changed = context.commit(solution, &insertion);
            for insertions in &mut pending {
                context.reevaluate(solution, insertions, changed);
            }
        }

        pending.sort_by_key(JobInsertions::job_id);
        for insertions in &pending {
            context.mark_unassigned(solution, insertions);
        }
    }
}
