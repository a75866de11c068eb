use rand::Rng;

use crate::{
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        events::{event_bus::EventBus, search_event::SearchEvent},
        ruin::ruin_params::RuinParams,
        solution::working_solution::WorkingSolution,
        state::state_manager::StateManager,
    },
};

pub struct RuinContext<'a, R>
where
    R: Rng,
{
    pub params: &'a RuinParams,
    pub problem: &'a VehicleRoutingProblem,
    pub states: &'a StateManager,
    pub events: &'a EventBus,
    pub rng: &'a mut R,
    pub num_jobs_to_remove: usize,
}

impl<R> RuinContext<'_, R>
where
    R: Rng,
{
    /// Assigned jobs a ruin may remove, breaks excluded, in job order.
    pub fn removable_jobs(&self, solution: &WorkingSolution) -> Vec<JobIdx> {
        let mut jobs = solution
            .routes()
            .iter()
            .flat_map(|route| route.job_ids())
            .filter(|&job_id| !self.problem.job(job_id).is_break())
            .collect::<Vec<_>>();
        jobs.sort_unstable();
        jobs
    }

    /// Removes every activity of the job from its route.
    pub fn remove_job(&self, solution: &mut WorkingSolution, job_id: JobIdx) -> bool {
        let Some(route_id) = solution.route_of_job(job_id) else {
            return false;
        };

        let removed = solution.remove_job(job_id);
        if removed {
            self.events
                .emit(|| SearchEvent::JobRemoved { job_id, route_id });
        }

        removed
    }
}
