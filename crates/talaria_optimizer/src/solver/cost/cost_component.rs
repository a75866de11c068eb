use crate::{
    problem::{travel_cost_matrix::Cost, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        solution::{route::WorkingSolutionRoute, working_solution::WorkingSolution},
        state::state_manager::StateManager,
    },
};

/// One term of the solution cost.
///
/// Components read refreshed route states; the default solution cost sums the route costs of
/// every route serving jobs.
pub trait CostComponent: Send + Sync {
    fn id(&self) -> &str;

    fn route_cost(
        &self,
        _problem: &VehicleRoutingProblem,
        _states: &StateManager,
        _route: &WorkingSolutionRoute,
    ) -> Cost {
        0.0
    }

    fn solution_cost(&self, states: &StateManager, solution: &WorkingSolution) -> Cost {
        solution
            .non_empty_routes_iter()
            .map(|route| self.route_cost(solution.problem(), states, route))
            .sum()
    }
}
