use fxhash::FxHashMap;
use rand::Rng;

use crate::{
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        solution::{route::WorkingSolutionRoute, working_solution::WorkingSolution},
        state::state_manager::StateManager,
    },
};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes the jobs whose removal saves the most, with randomness controlled by
/// `ruin_worst_determinism`: the higher it is, the more often the costliest job is picked.
pub struct RuinWorst;

/// Cost saved by removing each job of a refreshed route.
fn route_savings(
    problem: &VehicleRoutingProblem,
    states: &StateManager,
    route: &WorkingSolutionRoute,
) -> Vec<(JobIdx, f64)> {
    let route_cost = states.route_cost(route);

    route
        .job_ids()
        .filter(|&job_id| !problem.job(job_id).is_break())
        .map(|job_id| {
            let mut without = route.clone();
            without.remove_job(job_id);
            states.refresh(problem, &mut without);

            (job_id, route_cost - states.route_cost(&without))
        })
        .collect()
}

impl RuinSolution for RuinWorst {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let p = context.params.ruin_worst_determinism;
        context.states.refresh_solution(solution);

        let mut savings = solution
            .non_empty_routes_iter()
            .flat_map(|route| route_savings(context.problem, context.states, route))
            .collect::<FxHashMap<_, _>>();

        let mut removed = Vec::with_capacity(context.num_jobs_to_remove);
        let mut candidates = Vec::with_capacity(savings.len());

        while removed.len() < context.num_jobs_to_remove && !savings.is_empty() {
            candidates.clear();
            candidates.extend(savings.iter().map(|(&job_id, &saving)| (job_id, saving)));
            candidates.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

            let y: f64 = context.rng.random_range(0.0..1.0);
            let index = ((y.powf(p) * candidates.len() as f64).floor() as usize)
                .min(candidates.len() - 1);
            let job_id = candidates[index].0;

            let route_id = solution.route_of_job(job_id);
            savings.remove(&job_id);
            if !context.remove_job(solution, job_id) {
                continue;
            }
            removed.push(job_id);

            // Only the savings of the route the job left are stale
            if let Some(route_id) = route_id {
                let route = solution.route_mut(route_id);
                context.states.refresh(context.problem, route);
                savings.extend(route_savings(context.problem, context.states, route));
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        solver::{
            events::event_bus::EventBus, ruin::ruin_params::RuinParams,
            solution::route_id::RouteIdx,
        },
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_worst_ruin_removes_detours_first() {
        // (0) (1) (2)
        // (3) (4) (5)
        // (6) (7) (8)
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2, 8]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1, 2],
            }],
        );

        let states = StateManager::new();
        let mut rng = test_utils::MockRng::new(vec![0]);
        let removed = RuinWorst.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                states: &states,
                events: &EventBus::default(),
                rng: &mut rng,
                num_jobs_to_remove: 2,
            },
        );

        assert_eq!(removed, vec![JobIdx::new(2), JobIdx::new(1)]);
        assert_eq!(
            solution.route(RouteIdx::new(0)).job_ids().collect::<Vec<_>>(),
            vec![JobIdx::new(0)]
        );
    }

    #[test]
    fn test_worst_ruin_stops_when_nothing_left() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            test_utils::create_basic_services(vec![1, 3]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1],
            }],
        );

        let states = StateManager::new();
        let mut rng = test_utils::MockRng::new(vec![u64::MAX / 2]);
        let removed = RuinWorst.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                states: &states,
                events: &EventBus::default(),
                rng: &mut rng,
                num_jobs_to_remove: 5,
            },
        );

        assert_eq!(removed.len(), 2);
        assert!(solution.route(RouteIdx::new(0)).is_empty());
    }
}
