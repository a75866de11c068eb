use crate::{
    problem::{travel_cost_matrix::Cost, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        cost::cost_component::CostComponent, solution::route::WorkingSolutionRoute,
        state::state_manager::StateManager,
    },
};

pub const TRANSPORT_COST: &str = "transport";
pub const ACTIVITY_COST: &str = "activity";
pub const VEHICLE_FIXED_COST: &str = "vehicle_fixed";

/// Driving cost of each route.
#[derive(Default)]
pub struct TransportCostComponent;

impl CostComponent for TransportCostComponent {
    fn id(&self) -> &str {
        TRANSPORT_COST
    }

    fn route_cost(
        &self,
        _problem: &VehicleRoutingProblem,
        states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> Cost {
        states
            .route_state(route, states.core().transport_cost)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Waiting and lateness cost of the activities of each route.
#[derive(Default)]
pub struct ActivityCostComponent;

impl CostComponent for ActivityCostComponent {
    fn id(&self) -> &str {
        ACTIVITY_COST
    }

    fn route_cost(
        &self,
        _problem: &VehicleRoutingProblem,
        states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> Cost {
        states
            .route_state(route, states.core().activity_cost)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Fixed cost of every used vehicle.
#[derive(Default)]
pub struct VehicleFixedCostComponent;

impl CostComponent for VehicleFixedCostComponent {
    fn id(&self) -> &str {
        VEHICLE_FIXED_COST
    }

    fn route_cost(
        &self,
        problem: &VehicleRoutingProblem,
        _states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> Cost {
        route.vehicle(problem).costs().fixed
    }
}
