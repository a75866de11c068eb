use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        insertion_context::RouteInsertionContext, solution::route::WorkingSolutionRoute,
        state::state_manager::StateManager,
    },
};

use super::route_constraint::HardRouteConstraint;

pub const SKILLS: &str = "skills";

/// The vehicle must have every skill the job requires.
#[derive(Clone, Default)]
pub struct SkillsConstraint;

impl HardRouteConstraint for SkillsConstraint {
    fn code(&self) -> &'static str {
        SKILLS
    }

    fn fulfilled(&self, context: &RouteInsertionContext) -> bool {
        context.vehicle().is_compatible_with(context.job())
    }

    fn route_fulfilled(
        &self,
        problem: &VehicleRoutingProblem,
        _states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> bool {
        let vehicle = route.vehicle(problem);
        route
            .job_ids()
            .all(|job_id| vehicle.is_compatible_with(problem.job(job_id)))
    }
}
