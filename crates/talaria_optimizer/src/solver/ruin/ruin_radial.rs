use rand::{Rng, seq::IndexedRandom};

use crate::{problem::job::JobIdx, solver::solution::working_solution::WorkingSolution};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes a random job and its nearest neighbours, whatever route serves them.
pub struct RuinRadial;

impl RuinSolution for RuinRadial {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let candidates = context.removable_jobs(solution);
        let num_jobs_to_remove = context.num_jobs_to_remove.min(candidates.len());
        if num_jobs_to_remove == 0 {
            return Vec::new();
        }

        let Some(&seed_job_id) = candidates.choose(context.rng) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(num_jobs_to_remove);
        for &job_id in std::iter::once(&seed_job_id).chain(context.problem.nearest_jobs(seed_job_id))
        {
            if removed.len() == num_jobs_to_remove {
                break;
            }

            if context.remove_job(solution, job_id) {
                removed.push(job_id);
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{
        solver::{
            events::event_bus::EventBus, ruin::ruin_params::RuinParams,
            solution::route_id::RouteIdx, state::state_manager::StateManager,
        },
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_radial_ruin_basic() {
        let locations = test_utils::create_location_grid(4, 4);

        //
        //  ASCII Schema for coordinates:
        //
        //  Y-axis
        //  ^
        //  |
        //  | (0.0, 3.0) (12) (1.0, 3.0) (13) (2.0, 3.0) (14)  (3.0, 3.0) (15)
        //  |
        //  | (0.0, 2.0) (8) (1.0, 2.0) (9) (2.0, 2.0) (10) (3.0, 2.0) (11)
        //  |
        //  | (0.0, 1.0) (4)  (1.0, 1.0) (5) (2.0, 1.0) (6) (3.0, 1.0) (7)
        //  |
        //  | (0.0, 0.0) (0)  (1.0, 0.0) (1) (2.0, 0.0) (2) (3.0, 0.0) (3)
        //  +------------------------------------------------> X-axis
        let services = test_utils::create_basic_services(vec![1, 6, 8, 10]);
        let vehicles = test_utils::create_basic_vehicles(vec![0]);
        let problem = Arc::new(test_utils::create_test_problem(
            locations, services, vehicles,
        ));

        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1, 2, 3],
            }],
        );

        let mut rng = test_utils::MockRng::new(vec![0]);

        let removed = RuinRadial.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                states: &StateManager::new(),
                events: &EventBus::default(),
                rng: &mut rng,
                num_jobs_to_remove: 2,
            },
        );

        assert_eq!(removed, vec![JobIdx::new(0), JobIdx::new(1)]);
        assert_eq!(
            solution.route(RouteIdx::new(0)).job_ids().collect::<Vec<_>>(),
            vec![JobIdx::new(2), JobIdx::new(3)]
        );
    }

    #[test]
    fn test_request_above_assigned_count_empties_routes() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(4, 4),
            test_utils::create_basic_services(vec![1, 6, 8, 10, 15]),
            test_utils::create_basic_vehicles(vec![0, 0]),
        ));

        // Jobs 3 and 4 stay unassigned and are not counted as removed
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![
                TestRoute {
                    vehicle_id: 0,
                    service_ids: vec![0, 1],
                },
                TestRoute {
                    vehicle_id: 1,
                    service_ids: vec![2],
                },
            ],
        );
        let mut rng = SmallRng::seed_from_u64(7);

        let mut removed = RuinRadial.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                states: &StateManager::new(),
                events: &EventBus::default(),
                rng: &mut rng,
                num_jobs_to_remove: 10,
            },
        );

        removed.sort();
        assert_eq!(removed, vec![JobIdx::new(0), JobIdx::new(1), JobIdx::new(2)]);
        assert_eq!(solution.assigned_jobs_count(), 0);
        assert_eq!(solution.unassigned_jobs().len(), 5);
    }
}
