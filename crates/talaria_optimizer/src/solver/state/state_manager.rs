use fxhash::FxHashSet;
use tracing::debug;

use crate::{
    problem::{amount::Amount, location::LocationIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        solution::{route::WorkingSolutionRoute, working_solution::WorkingSolution},
        solver_error::SolverError,
        state::{
            latest_start_updater::LatestStartUpdater,
            load_updater::{FutureLoadUpdater, LoadUpdater},
            schedule_updater::ScheduleUpdater,
            state_id::StateId,
            state_updater::{StateUpdater, VisitOrder},
            state_value::StateType,
        },
    },
};

/// Ids of the states maintained for every route.
#[derive(Debug, Clone, Copy)]
pub struct CoreStates {
    pub cost: StateId<f64>,
    pub transport_cost: StateId<f64>,
    pub activity_cost: StateId<f64>,
    pub distance: StateId<f64>,
    pub waiting: StateId<f64>,
    pub duration: StateId<f64>,
    pub load_at_beginning: StateId<Amount>,
    pub load_at_end: StateId<Amount>,
    pub max_load: StateId<Amount>,
    /// Whether some activity starts after all of its time windows closed.
    pub late: StateId<bool>,

    pub cost_so_far: StateId<f64>,
    pub load: StateId<Amount>,
    pub past_max_load: StateId<Amount>,
    pub future_max_load: StateId<Amount>,
    pub latest_start: StateId<f64>,
    pub effective_location: StateId<LocationIdx>,
}

/// Registry of state ids and state updaters for one search run.
///
/// Routes own their cached values; the manager only hands them out once the route has been
/// refreshed since its last structural change.
pub struct StateManager {
    names: Vec<String>,
    reserved: FxHashSet<String>,
    updaters: Vec<Box<dyn StateUpdater>>,
    core: CoreStates,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    pub fn new() -> Self {
        let mut names = Vec::new();
        let mut reserve = |name: &str| {
            names.push(name.to_owned());
            names.len() - 1
        };

        let core = CoreStates {
            cost: StateId::new(reserve("cost")),
            transport_cost: StateId::new(reserve("transport_cost")),
            activity_cost: StateId::new(reserve("activity_cost")),
            distance: StateId::new(reserve("distance")),
            waiting: StateId::new(reserve("waiting")),
            duration: StateId::new(reserve("duration")),
            load_at_beginning: StateId::new(reserve("load_at_beginning")),
            load_at_end: StateId::new(reserve("load_at_end")),
            max_load: StateId::new(reserve("max_load")),
            late: StateId::new(reserve("late")),
            cost_so_far: StateId::new(reserve("cost_so_far")),
            load: StateId::new(reserve("load")),
            past_max_load: StateId::new(reserve("past_max_load")),
            future_max_load: StateId::new(reserve("future_max_load")),
            latest_start: StateId::new(reserve("latest_start")),
            effective_location: StateId::new(reserve("effective_location")),
        };

        let reserved = names.iter().cloned().collect();

        StateManager {
            names,
            reserved,
            updaters: vec![
                Box::new(ScheduleUpdater::new(core)),
                Box::new(LoadUpdater::new(core)),
                Box::new(FutureLoadUpdater::new(core)),
                Box::new(LatestStartUpdater::new(core)),
            ],
            core,
        }
    }

    pub fn core(&self) -> &CoreStates {
        &self.core
    }

    pub fn create_state_id<T: StateType>(&mut self, name: &str) -> Result<StateId<T>, SolverError> {
        if !self.reserved.insert(name.to_owned()) {
            return Err(SolverError::DuplicateStateId(name.to_owned()));
        }

        self.names.push(name.to_owned());
        Ok(StateId::new(self.names.len() - 1))
    }

    pub fn state_name<T>(&self, id: StateId<T>) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Registers an updater, run after every updater registered before it.
    pub fn add_state_updater(&mut self, updater: Box<dyn StateUpdater>) {
        debug!("Registered state updater {}", updater.name());
        self.updaters.push(updater);
    }

    pub fn put_route_state<T: StateType>(
        &self,
        route: &mut WorkingSolutionRoute,
        id: StateId<T>,
        value: T,
    ) {
        route.states_mut().put_route(id, value);
    }

    /// `None` when the state was never written or the route changed since its last refresh.
    pub fn route_state<'a, T: StateType>(
        &self,
        route: &'a WorkingSolutionRoute,
        id: StateId<T>,
    ) -> Option<&'a T> {
        let states = route.states();
        if states.is_dirty() {
            return None;
        }

        states.route(id)
    }

    pub fn put_activity_state<T: StateType>(
        &self,
        route: &mut WorkingSolutionRoute,
        id: StateId<T>,
        position: usize,
        value: T,
    ) {
        route.states_mut().put_activity(id, position, value);
    }

    pub fn activity_state<'a, T: StateType>(
        &self,
        route: &'a WorkingSolutionRoute,
        id: StateId<T>,
        position: usize,
    ) -> Option<&'a T> {
        let states = route.states();
        if states.is_dirty() {
            return None;
        }

        states.activity(id, position)
    }

    /// Recomputes every state of the route from scratch.
    pub fn refresh(&self, problem: &VehicleRoutingProblem, route: &mut WorkingSolutionRoute) {
        let vehicle_id = route.vehicle_id();
        let (activities, states) = route.activities_and_states_mut();
        states.reset(self.names.len(), activities.len());

        for updater in &self.updaters {
            let mut visitor = updater.visitor(problem, vehicle_id);
            visitor.begin(activities, states);

            match updater.order() {
                VisitOrder::Forward => {
                    for (position, activity) in activities.iter_mut().enumerate() {
                        visitor.visit(position, activity, states);
                    }
                }
                VisitOrder::Backward => {
                    for (position, activity) in activities.iter_mut().enumerate().rev() {
                        visitor.visit(position, activity, states);
                    }
                }
            }

            visitor.finish(states);
        }

        states.mark_clean();
    }

    /// Refreshes every dirty route of the solution.
    pub fn refresh_solution(&self, solution: &mut WorkingSolution) {
        let problem = solution.problem_arc();
        for route in solution.routes_mut() {
            if route.states().is_dirty() {
                self.refresh(&problem, route);
            }
        }
    }

    /// Cost of a refreshed route, fixed cost included when the route serves jobs.
    pub fn route_cost(&self, route: &WorkingSolutionRoute) -> f64 {
        self.route_state(route, self.core.cost)
            .copied()
            .unwrap_or(0.0)
    }
}
