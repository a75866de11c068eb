use crate::{
    problem::{
        amount::Amount,
        job::{Job, JobIdx},
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        solution::{
            route::WorkingSolutionRoute, route_schedule::ScheduleStep, tour_activity::TourActivity,
        },
        state::state_manager::StateManager,
    },
};

/// A job about to be evaluated against a route, possibly on another vehicle than the route's.
pub struct RouteInsertionContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub states: &'a StateManager,
    /// Refreshed route, already moved to `vehicle_id` when evaluating a vehicle switch.
    pub route: &'a WorkingSolutionRoute,
    pub vehicle_id: VehicleIdx,
    pub job_id: JobIdx,
}

impl<'a> RouteInsertionContext<'a> {
    pub fn vehicle(&self) -> &'a Vehicle {
        self.problem.vehicle(self.vehicle_id)
    }

    pub fn job(&self) -> &'a Job {
        self.problem.job(self.job_id)
    }
}

/// A new activity placed between `prev` and `next` with its simulated schedule.
pub struct ActivityInsertionContext<'a> {
    pub route: &'a RouteInsertionContext<'a>,
    pub prev: &'a TourActivity,
    /// Position of `prev` in the route, `None` when `prev` is another new activity.
    pub prev_position: Option<usize>,
    pub activity: &'a TourActivity,
    pub next: &'a TourActivity,
    /// Position of `next` in the route, `None` when `next` is another new activity.
    pub next_position: Option<usize>,
    pub step: &'a ScheduleStep,
    /// For the delivery of a shipment: largest load carried between its pickup and the delivery
    /// before the shipment is added.
    pub load_between: Option<&'a Amount>,
}

impl<'a> ActivityInsertionContext<'a> {
    pub fn problem(&self) -> &'a VehicleRoutingProblem {
        self.route.problem
    }

    pub fn states(&self) -> &'a StateManager {
        self.route.states
    }

    pub fn vehicle(&self) -> &'a Vehicle {
        self.route.vehicle()
    }
}
