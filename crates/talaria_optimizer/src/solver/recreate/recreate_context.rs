use rand::rngs::SmallRng;
use rayon::prelude::*;

use crate::{
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        constraints::hard_constraints::HardConstraints,
        events::{event_bus::EventBus, search_event::SearchEvent},
        insertion::Insertion,
        insertion_evaluator::{InsertionEvaluator, RouteEvaluation, add_failure},
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
        state::state_manager::StateManager,
    },
};

use super::{
    job_insertions::JobInsertions, recreate_params::RecreateParams,
    vehicle_switch::VehicleSwitches,
};

/// Routes whose evaluations are stale after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangedRoutes {
    All,
    Single(RouteIdx),
}

pub struct RecreateContext<'a> {
    pub rng: &'a mut SmallRng,
    pub problem: &'a VehicleRoutingProblem,
    pub states: &'a StateManager,
    pub constraints: &'a HardConstraints,
    pub params: &'a RecreateParams,
    pub thread_pool: Option<&'a rayon::ThreadPool>,
    pub events: &'a EventBus,
    switches: VehicleSwitches,
}

impl<'a> RecreateContext<'a> {
    pub fn new(
        rng: &'a mut SmallRng,
        problem: &'a VehicleRoutingProblem,
        states: &'a StateManager,
        constraints: &'a HardConstraints,
        params: &'a RecreateParams,
        thread_pool: Option<&'a rayon::ThreadPool>,
        events: &'a EventBus,
    ) -> Self {
        RecreateContext {
            rng,
            problem,
            states,
            constraints,
            params,
            thread_pool,
            events,
            switches: VehicleSwitches::default(),
        }
    }

    /// Refreshes the solution and the vehicle switch candidates before evaluating insertions.
    pub fn prepare(&mut self, solution: &mut WorkingSolution) {
        self.states.refresh_solution(solution);
        self.switches = if self.params.vehicle_switch {
            VehicleSwitches::build(self.states, self.constraints, solution)
        } else {
            VehicleSwitches::default()
        };
    }

    /// Best insertion of `job_id` into the route, on its own vehicle or after a switch.
    pub fn evaluate_route(
        &self,
        solution: &WorkingSolution,
        route_id: RouteIdx,
        job_id: JobIdx,
    ) -> RouteEvaluation {
        let evaluator = InsertionEvaluator::new(self.problem, self.states, self.constraints);
        let own = evaluator.evaluate(route_id, solution.route(route_id), job_id, 0.0);

        self.switches
            .candidates(route_id)
            .iter()
            .map(|candidate| {
                evaluator.evaluate(route_id, &candidate.route, job_id, candidate.extra_cost)
            })
            .fold(own, |best, evaluation| match (best, evaluation) {
                (Ok(best), Ok(insertion)) if insertion.cost() < best.cost() => Ok(insertion),
                (Ok(best), _) => Ok(best),
                (Err(_), Ok(insertion)) => Ok(insertion),
                (Err(mut failures), Err(others)) => {
                    for code in others {
                        add_failure(&mut failures, code);
                    }
                    Err(failures)
                }
            })
    }

    pub fn evaluate_job(&self, solution: &WorkingSolution, job_id: JobIdx) -> JobInsertions {
        let route_ids = (0..solution.routes().len()).map(RouteIdx::new);

        let evaluations = match self.thread_pool {
            Some(pool) => pool.install(|| {
                route_ids
                    .collect::<Vec<_>>()
                    .into_par_iter()
                    .map(|route_id| self.evaluate_route(solution, route_id, job_id))
                    .collect()
            }),
            None => route_ids
                .map(|route_id| self.evaluate_route(solution, route_id, job_id))
                .collect(),
        };

        JobInsertions::new(job_id, evaluations)
    }

    /// Applies the insertion, refreshes the touched routes and reports what has to be evaluated
    /// again.
    pub fn commit(&mut self, solution: &mut WorkingSolution, insertion: &Insertion) -> ChangedRoutes {
        let route_id = insertion.route_id();
        let previous_vehicle_id = solution.route(route_id).vehicle_id();
        let was_empty = solution.route(route_id).is_empty();
        let route_count = solution.routes().len();

        solution.insert(insertion);
        self.states.refresh_solution(solution);

        if previous_vehicle_id != insertion.vehicle_id() {
            self.events.emit(|| SearchEvent::VehicleSwitched {
                route_id,
                from: previous_vehicle_id,
                to: insertion.vehicle_id(),
            });
        }
        self.events.emit(|| SearchEvent::JobInserted {
            job_id: insertion.job_idx(),
            route_id,
            vehicle_id: insertion.vehicle_id(),
            cost: insertion.cost(),
        });

        // Using an empty route or switching vehicles changes the vehicles available to all
        // routes
        let changed = if was_empty
            || previous_vehicle_id != insertion.vehicle_id()
            || route_count != solution.routes().len()
        {
            ChangedRoutes::All
        } else {
            ChangedRoutes::Single(route_id)
        };

        if self.params.vehicle_switch {
            match changed {
                ChangedRoutes::All => {
                    self.switches = VehicleSwitches::build(self.states, self.constraints, solution)
                }
                ChangedRoutes::Single(route_id) => {
                    self.switches
                        .update_route(self.states, self.constraints, solution, route_id)
                }
            }
        }

        changed
    }

    /// Re-evaluates `insertions` against the routes changed by the last commit.
    pub fn reevaluate(
        &self,
        solution: &WorkingSolution,
        insertions: &mut JobInsertions,
        changed: ChangedRoutes,
    ) {
        match changed {
            ChangedRoutes::All => *insertions = self.evaluate_job(solution, insertions.job_id()),
            ChangedRoutes::Single(route_id) => insertions.set_route(
                route_id,
                self.evaluate_route(solution, route_id, insertions.job_id()),
            ),
        }
    }

    pub fn mark_unassigned(&self, solution: &mut WorkingSolution, insertions: &JobInsertions) {
        let reasons = insertions.reasons(solution);
        self.events.emit(|| SearchEvent::JobUnassigned {
            job_id: insertions.job_id(),
            reasons: reasons.clone(),
        });
        solution.set_unassigned_reasons(insertions.job_id(), reasons);
    }
}

/// Moves breaks behind the other jobs, keeping the relative order of both groups. A break needs
/// its vehicle's route to serve something first.
pub fn breaks_last(problem: &VehicleRoutingProblem, jobs: &mut [JobIdx]) {
    jobs.sort_by_key(|&job_id| problem.job(job_id).is_break());
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;

    use crate::{
        problem::vehicle::VehicleBuilder,
        solver::events::event_recorder::EventRecorder,
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_commit_switches_to_cheaper_vehicle() {
        let mut expensive = VehicleBuilder::new("expensive", 0);
        expensive
            .set_capacity(test_utils::basic_capacity())
            .set_fixed_cost(100.0);
        let mut cheap = VehicleBuilder::new("cheap", 0);
        cheap.set_capacity(test_utils::basic_capacity());

        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 4),
            test_utils::create_basic_services(vec![1, 2]),
            vec![expensive.build(), cheap.build()],
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );

        let states = StateManager::new();
        let constraints = HardConstraints::with_default_constraints();
        let params = RecreateParams::default();
        let recorder = Arc::new(EventRecorder::only(vec!["vehicle_switched"]));
        let mut events = EventBus::default();
        events.subscribe(recorder.clone());
        let mut rng = SmallRng::seed_from_u64(0);

        let mut context = RecreateContext::new(
            &mut rng,
            &problem,
            &states,
            &constraints,
            &params,
            None,
            &events,
        );
        context.prepare(&mut solution);

        let insertions = context.evaluate_job(&solution, 1.into());
        let best = insertions.best().cloned().unwrap();
        assert_eq!(best.route_id(), RouteIdx::new(0));
        assert_eq!(best.vehicle_id(), 1.into());
        // One more unit of distance, minus the fixed cost saved
        assert_eq!(best.cost(), -98.0);

        assert_eq!(context.commit(&mut solution, &best), ChangedRoutes::All);
        assert_eq!(solution.route(0.into()).vehicle_id(), 1.into());
        assert_eq!(solution.route(1.into()).vehicle_id(), 0.into());
        assert_eq!(solution.route(0.into()).num_jobs(), 2);
        assert_eq!(recorder.count("vehicle_switched"), 1);
    }

    #[test]
    fn test_parallel_evaluation_matches_sequential() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(4, 4),
            test_utils::create_basic_services(vec![3, 5, 9, 12, 15]),
            test_utils::create_basic_vehicles(vec![0, 0, 6]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![
                TestRoute {
                    vehicle_id: 0,
                    service_ids: vec![0, 1],
                },
                TestRoute {
                    vehicle_id: 2,
                    service_ids: vec![2],
                },
            ],
        );

        let states = StateManager::new();
        let constraints = HardConstraints::with_default_constraints();
        let params = RecreateParams::default();
        let events = EventBus::default();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut context = RecreateContext::new(
            &mut rng,
            &problem,
            &states,
            &constraints,
            &params,
            None,
            &events,
        );
        context.prepare(&mut solution);

        let sequential = context.evaluate_job(&solution, 3.into());
        context.thread_pool = Some(&pool);
        let parallel = context.evaluate_job(&solution, 3.into());

        assert_eq!(sequential.best(), parallel.best());
        assert_eq!(sequential.reasons(&solution), parallel.reasons(&solution));
    }
}
