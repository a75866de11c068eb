use std::sync::Arc;

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        insertion_context::RouteInsertionContext, solution::route::WorkingSolutionRoute,
        state::state_manager::StateManager,
    },
};

use super::{
    break_constraint::BreakVehicleConstraint, capacity_constraint::CapacityConstraint,
    skills_constraint::SkillsConstraint,
};

/// Feasibility of a job on a route, checked once per route before scanning positions.
pub trait HardRouteConstraint {
    fn code(&self) -> &'static str;

    fn fulfilled(&self, context: &RouteInsertionContext) -> bool;

    /// Whether a refreshed route satisfies the constraint as it is. Used when moving a route to
    /// another vehicle.
    fn route_fulfilled(
        &self,
        _problem: &VehicleRoutingProblem,
        _states: &StateManager,
        _route: &WorkingSolutionRoute,
    ) -> bool {
        true
    }
}

type RouteCheck = dyn Fn(&RouteInsertionContext) -> bool + Send + Sync;

#[derive(Clone)]
pub struct CustomRouteConstraint {
    code: &'static str,
    check: Arc<RouteCheck>,
}

impl CustomRouteConstraint {
    pub fn from_fn(
        code: &'static str,
        check: impl Fn(&RouteInsertionContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        CustomRouteConstraint {
            code,
            check: Arc::new(check),
        }
    }
}

impl HardRouteConstraint for CustomRouteConstraint {
    fn code(&self) -> &'static str {
        self.code
    }

    fn fulfilled(&self, context: &RouteInsertionContext) -> bool {
        (self.check)(context)
    }
}

#[derive(Clone)]
pub enum RouteConstraintType {
    Capacity(CapacityConstraint),
    Skills(SkillsConstraint),
    BreakVehicle(BreakVehicleConstraint),
    Custom(CustomRouteConstraint),
}

impl HardRouteConstraint for RouteConstraintType {
    fn code(&self) -> &'static str {
        match self {
            RouteConstraintType::Capacity(c) => c.code(),
            RouteConstraintType::Skills(c) => c.code(),
            RouteConstraintType::BreakVehicle(c) => c.code(),
            RouteConstraintType::Custom(c) => c.code(),
        }
    }

    fn fulfilled(&self, context: &RouteInsertionContext) -> bool {
        match self {
            RouteConstraintType::Capacity(c) => c.fulfilled(context),
            RouteConstraintType::Skills(c) => c.fulfilled(context),
            RouteConstraintType::BreakVehicle(c) => c.fulfilled(context),
            RouteConstraintType::Custom(c) => c.fulfilled(context),
        }
    }

    fn route_fulfilled(
        &self,
        problem: &VehicleRoutingProblem,
        states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> bool {
        match self {
            RouteConstraintType::Capacity(c) => c.route_fulfilled(problem, states, route),
            RouteConstraintType::Skills(c) => c.route_fulfilled(problem, states, route),
            RouteConstraintType::BreakVehicle(c) => c.route_fulfilled(problem, states, route),
            RouteConstraintType::Custom(c) => c.route_fulfilled(problem, states, route),
        }
    }
}
