use crate::{
    problem::{
        amount::ZERO_AMOUNT, job::Job, service::ServiceType,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        insertion_context::RouteInsertionContext, solution::route::WorkingSolutionRoute,
        state::state_manager::StateManager,
    },
};

use super::route_constraint::HardRouteConstraint;

pub const CAPACITY: &str = "capacity";

/// The load a job adds at the start or at the end of the route must fit in the vehicle.
#[derive(Clone, Default)]
pub struct CapacityConstraint;

impl HardRouteConstraint for CapacityConstraint {
    fn code(&self) -> &'static str {
        CAPACITY
    }

    fn fulfilled(&self, context: &RouteInsertionContext) -> bool {
        let job = context.job();
        let demand = job.demand();
        if demand.is_empty() {
            return true;
        }

        let capacity = context.vehicle().capacity();
        let states = context.states;
        let core = states.core();
        let route = context.route;

        match job {
            Job::Service(service) => {
                let id = match service.service_type() {
                    ServiceType::Pickup => core.load_at_end,
                    ServiceType::Delivery => core.load_at_beginning,
                };
                let load = states.route_state(route, id).unwrap_or(&ZERO_AMOUNT);
                (load + demand).fits_in(capacity)
            }
            Job::Shipment(_) => demand.fits_in(capacity),
            Job::Break(_) => true,
        }
    }

    fn route_fulfilled(
        &self,
        problem: &VehicleRoutingProblem,
        states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> bool {
        states
            .route_state(route, states.core().max_load)
            .is_none_or(|max_load| max_load.fits_in(route.vehicle(problem).capacity()))
    }
}
