use crate::{
    problem::{
        travel_cost_matrix::Cost, vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        constraints::hard_constraints::HardConstraints,
        solution::{
            route::WorkingSolutionRoute, route_id::RouteIdx, working_solution::WorkingSolution,
        },
        state::state_manager::StateManager,
    },
};

/// Copy of a non-empty route moved to another vehicle.
#[derive(Debug, Clone)]
pub struct SwitchCandidate {
    pub route: WorkingSolutionRoute,
    /// Cost of the moved route minus the cost of the route on its current vehicle.
    pub extra_cost: Cost,
}

/// Feasible vehicle switches of every route, kept until the set of available vehicles changes.
#[derive(Debug, Default)]
pub struct VehicleSwitches {
    candidates: Vec<Vec<SwitchCandidate>>,
}

impl VehicleSwitches {
    pub fn build(
        states: &StateManager,
        constraints: &HardConstraints,
        solution: &WorkingSolution,
    ) -> Self {
        let unused_vehicles = solution.unused_vehicles();

        VehicleSwitches {
            candidates: solution
                .routes()
                .iter()
                .map(|route| {
                    route_candidates(
                        solution.problem(),
                        states,
                        constraints,
                        route,
                        &unused_vehicles,
                    )
                })
                .collect(),
        }
    }

    /// Recomputes the candidates of a single route whose jobs changed.
    pub fn update_route(
        &mut self,
        states: &StateManager,
        constraints: &HardConstraints,
        solution: &WorkingSolution,
        route_id: RouteIdx,
    ) {
        self.candidates
            .resize_with(solution.routes().len(), Vec::new);
        self.candidates[route_id.get()] = route_candidates(
            solution.problem(),
            states,
            constraints,
            solution.route(route_id),
            &solution.unused_vehicles(),
        );
    }

    pub fn candidates(&self, route_id: RouteIdx) -> &[SwitchCandidate] {
        self.candidates
            .get(route_id.get())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn route_candidates(
    problem: &VehicleRoutingProblem,
    states: &StateManager,
    constraints: &HardConstraints,
    route: &WorkingSolutionRoute,
    unused_vehicles: &[VehicleIdx],
) -> Vec<SwitchCandidate> {
    if route.is_empty() {
        return Vec::new();
    }

    let current_cost = states.route_cost(route);
    unused_vehicles
        .iter()
        .filter(|&&vehicle_id| vehicle_id != route.vehicle_id())
        .filter_map(|&vehicle_id| {
            let mut candidate = route.clone();
            candidate.set_vehicle(problem, vehicle_id);
            states.refresh(problem, &mut candidate);

            constraints
                .check_existing_route(problem, states, &candidate)
                .ok()?;

            Some(SwitchCandidate {
                extra_cost: states.route_cost(&candidate) - current_cost,
                route: candidate,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::{
            amount::Amount, service::ServiceBuilder, vehicle::VehicleBuilder,
            vehicle_routing_problem::VehicleRoutingProblemBuilder,
        },
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_candidates_skip_infeasible_vehicles() {
        let mut service = ServiceBuilder::new("s1", 1);
        service.set_demand(Amount::from_vec(vec![3.0]));

        let mut current = VehicleBuilder::new("current", 0);
        current
            .set_capacity(Amount::from_vec(vec![5.0]))
            .set_fixed_cost(10.0);
        let mut cheap = VehicleBuilder::new("cheap", 0);
        cheap.set_capacity(Amount::from_vec(vec![5.0]));
        let mut small = VehicleBuilder::new("small", 0);
        small.set_capacity(Amount::from_vec(vec![2.0]));

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(1, 3))
            .add_service(service.build())
            .set_vehicles(vec![current.build(), cheap.build(), small.build()]);
        let problem = Arc::new(builder.build().unwrap());

        let states = StateManager::new();
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );
        states.refresh_solution(&mut solution);

        let switches = VehicleSwitches::build(
            &states,
            &HardConstraints::with_default_constraints(),
            &solution,
        );

        let candidates = switches.candidates(0.into());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].route.vehicle_id(), VehicleIdx::new(1));
        assert_eq!(candidates[0].extra_cost, -10.0);
        assert!(switches.candidates(1.into()).is_empty());
    }
}
