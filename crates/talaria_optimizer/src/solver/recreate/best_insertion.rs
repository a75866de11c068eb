use std::fmt::Display;

use rand::{rngs::SmallRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::solution::working_solution::WorkingSolution,
};

use super::{
    recreate_context::{RecreateContext, breaks_last},
    recreate_solution::RecreateSolution,
};

/// Inserts the unassigned jobs one after the other, each at its cheapest position.
#[derive(Default)]
pub struct BestInsertion {
    sort_strategy: BestInsertionSortStrategy,
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestInsertionSortStrategy {
    #[default]
    Random,
    /// Largest first demand first.
    Demand,
    /// Farthest from the depots first.
    Far,
    /// Closest to the depots first.
    Close,
}

impl Display for BestInsertionSortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::Demand => write!(f, "Demand"),
            Self::Far => write!(f, "Far"),
            Self::Close => write!(f, "Close"),
        }
    }
}

impl BestInsertion {
    pub fn new(sort_strategy: BestInsertionSortStrategy) -> Self {
        BestInsertion { sort_strategy }
    }

    pub fn sort_unassigned_jobs(
        &self,
        problem: &VehicleRoutingProblem,
        unassigned_jobs: &mut [JobIdx],
        rng: &mut SmallRng,
    ) {
        match self.sort_strategy {
            BestInsertionSortStrategy::Random => unassigned_jobs.shuffle(rng),
            BestInsertionSortStrategy::Demand => unassigned_jobs.sort_by(|&a, &b| {
                let first_demand_a = problem.job(a).demand().get(0);
                let first_demand_b = problem.job(b).demand().get(0);

                first_demand_b.total_cmp(&first_demand_a)
            }),
            BestInsertionSortStrategy::Far => unassigned_jobs.sort_by(|&a, &b| {
                problem
                    .job_cost_from_depot(b)
                    .total_cmp(&problem.job_cost_from_depot(a))
            }),
            BestInsertionSortStrategy::Close => unassigned_jobs.sort_by(|&a, &b| {
                problem
                    .job_cost_from_depot(a)
                    .total_cmp(&problem.job_cost_from_depot(b))
            }),
        }

        breaks_last(problem, unassigned_jobs);
    }
}

impl RecreateSolution for BestInsertion {
    fn recreate_solution(&self, solution: &mut WorkingSolution, context: &mut RecreateContext) {
        context.prepare(solution);

        let mut unassigned_jobs = solution.sorted_unassigned_jobs();
        self.sort_unassigned_jobs(context.problem, &mut unassigned_jobs, context.rng);

        for job_id in unassigned_jobs {
            let insertions = context.evaluate_job(solution, job_id);
            match insertions.best().cloned() {
                Some(insertion) => {
                    context.commit(solution, &insertion);
                }
                None => context.mark_unassigned(solution, &insertions),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;

    use crate::{
        problem::{amount::Amount, service::ServiceBuilder, vehicle::VehicleBuilder},
        solver::{
            constraints::{capacity_constraint::CAPACITY, hard_constraints::HardConstraints},
            events::event_bus::EventBus,
            recreate::recreate_params::RecreateParams,
            state::state_manager::StateManager,
        },
        test_utils,
    };

    use super::*;

    fn recreate(solution: &mut WorkingSolution, sort_strategy: BestInsertionSortStrategy) {
        let problem = solution.problem_arc();
        let states = StateManager::new();
        let constraints = HardConstraints::with_default_constraints();
        let params = RecreateParams::default();
        let events = EventBus::default();
        let mut rng = SmallRng::seed_from_u64(7);

        let mut context = RecreateContext::new(
            &mut rng,
            &problem,
            &states,
            &constraints,
            &params,
            None,
            &events,
        );
        BestInsertion::new(sort_strategy).recreate_solution(solution, &mut context);
    }

    #[test]
    fn test_inserts_every_job() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(5, 5),
            test_utils::create_basic_services(vec![3, 7, 11, 16, 20, 24]),
            test_utils::create_basic_vehicles(vec![0, 12]),
        ));

        for sort_strategy in [
            BestInsertionSortStrategy::Random,
            BestInsertionSortStrategy::Demand,
            BestInsertionSortStrategy::Far,
            BestInsertionSortStrategy::Close,
        ] {
            let mut solution = WorkingSolution::new(Arc::clone(&problem));
            recreate(&mut solution, sort_strategy);

            assert!(!solution.has_unassigned());
            assert_eq!(solution.assigned_jobs_count(), 6);
        }
    }

    #[test]
    fn test_sort_far_and_close() {
        let problem = test_utils::create_test_problem(
            test_utils::create_location_grid(1, 5),
            test_utils::create_basic_services(vec![2, 4, 1]),
            test_utils::create_basic_vehicles(vec![0]),
        );
        let mut rng = SmallRng::seed_from_u64(0);

        let mut jobs = vec![JobIdx::new(0), JobIdx::new(1), JobIdx::new(2)];
        BestInsertion::new(BestInsertionSortStrategy::Far).sort_unassigned_jobs(
            &problem,
            &mut jobs,
            &mut rng,
        );
        assert_eq!(jobs, vec![JobIdx::new(1), JobIdx::new(0), JobIdx::new(2)]);

        BestInsertion::new(BestInsertionSortStrategy::Close).sort_unassigned_jobs(
            &problem,
            &mut jobs,
            &mut rng,
        );
        assert_eq!(jobs, vec![JobIdx::new(2), JobIdx::new(0), JobIdx::new(1)]);
    }

    #[test]
    fn test_jobs_over_capacity_stay_unassigned() {
        let mut vehicle = VehicleBuilder::new("v1", 0);
        vehicle.set_capacity(Amount::from_vec(vec![3.0]));

        let services = [1usize, 2, 3]
            .into_iter()
            .map(|location| {
                let mut service = ServiceBuilder::new(format!("s{location}"), location);
                service.set_demand(Amount::from_vec(vec![2.0]));
                service.build()
            })
            .collect();

        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            services,
            vec![vehicle.build()],
        ));
        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        recreate(&mut solution, BestInsertionSortStrategy::Demand);

        assert_eq!(solution.assigned_jobs_count(), 1);
        assert_eq!(solution.unassigned_jobs().len(), 2);
        for job_id in solution.sorted_unassigned_jobs() {
            let reasons = solution.unassigned_reasons(job_id);
            assert_eq!(reasons.len(), 1);
            assert_eq!(reasons[0].code, CAPACITY);
        }
    }
}
