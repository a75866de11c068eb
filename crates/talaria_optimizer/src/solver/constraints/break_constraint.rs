use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        insertion_context::RouteInsertionContext, solution::route::WorkingSolutionRoute,
        state::state_manager::StateManager,
    },
};

use super::route_constraint::HardRouteConstraint;

pub const BREAK_VEHICLE: &str = "break_vehicle";

/// A break only goes into a route of its own vehicle that already serves other jobs.
#[derive(Clone, Default)]
pub struct BreakVehicleConstraint;

impl HardRouteConstraint for BreakVehicleConstraint {
    fn code(&self) -> &'static str {
        BREAK_VEHICLE
    }

    fn fulfilled(&self, context: &RouteInsertionContext) -> bool {
        if !context.job().is_break() {
            return true;
        }

        context.problem.break_vehicle(context.job_id) == Some(context.vehicle_id)
            && !context.route.is_empty()
    }

    fn route_fulfilled(
        &self,
        problem: &VehicleRoutingProblem,
        _states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> bool {
        route
            .job_ids()
            .filter(|&job_id| problem.job(job_id).is_break())
            .all(|job_id| problem.break_vehicle(job_id) == Some(route.vehicle_id()))
    }
}
