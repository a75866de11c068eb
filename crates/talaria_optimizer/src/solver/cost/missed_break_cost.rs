use crate::{
    problem::{travel_cost_matrix::Cost, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        cost::cost_component::CostComponent, solution::route::WorkingSolutionRoute,
        state::state_manager::StateManager,
    },
};

pub const MISSED_BREAK: &str = "missed_break";

/// Penalty for a used vehicle whose break is not in its route.
pub struct MissedBreakComponent {
    factor: f64,
}

impl MissedBreakComponent {
    pub fn new(factor: f64) -> Self {
        MissedBreakComponent { factor }
    }
}

impl CostComponent for MissedBreakComponent {
    fn id(&self) -> &str {
        MISSED_BREAK
    }

    fn route_cost(
        &self,
        problem: &VehicleRoutingProblem,
        _states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> Cost {
        match problem.vehicle_break(route.vehicle_id()) {
            Some(break_id) if !route.contains_job(break_id) => problem.max_cost() * self.factor,
            _ => 0.0,
        }
    }
}
