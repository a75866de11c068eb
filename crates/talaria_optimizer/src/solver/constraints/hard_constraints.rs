use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        insertion_context::{ActivityInsertionContext, RouteInsertionContext},
        solution::route::WorkingSolutionRoute,
        state::state_manager::StateManager,
    },
};

use super::{
    activity_constraint::{ActivityConstraintType, HardActivityConstraint},
    break_constraint::BreakVehicleConstraint,
    capacity_constraint::CapacityConstraint,
    load_constraint::LoadConstraint,
    route_constraint::{HardRouteConstraint, RouteConstraintType},
    skills_constraint::SkillsConstraint,
    time_window_constraint::{TIME_WINDOW, TimeWindowConstraint},
};

/// Registered hard constraints, checked in registration order. The first failing constraint
/// reports its code.
#[derive(Clone, Default)]
pub struct HardConstraints {
    route_constraints: Vec<RouteConstraintType>,
    activity_constraints: Vec<ActivityConstraintType>,
}

impl HardConstraints {
    pub fn with_default_constraints() -> Self {
        HardConstraints {
            route_constraints: vec![
                RouteConstraintType::Skills(SkillsConstraint),
                RouteConstraintType::BreakVehicle(BreakVehicleConstraint),
                RouteConstraintType::Capacity(CapacityConstraint),
            ],
            activity_constraints: vec![
                ActivityConstraintType::Load(LoadConstraint),
                ActivityConstraintType::TimeWindow(TimeWindowConstraint),
            ],
        }
    }

    pub fn add_route_constraint(&mut self, constraint: RouteConstraintType) -> &mut Self {
        self.route_constraints.push(constraint);
        self
    }

    pub fn add_activity_constraint(&mut self, constraint: ActivityConstraintType) -> &mut Self {
        self.activity_constraints.push(constraint);
        self
    }

    pub fn route_constraints(&self) -> &[RouteConstraintType] {
        &self.route_constraints
    }

    pub fn activity_constraints(&self) -> &[ActivityConstraintType] {
        &self.activity_constraints
    }

    pub fn has_time_window_constraint(&self) -> bool {
        self.activity_constraints
            .iter()
            .any(|constraint| matches!(constraint, ActivityConstraintType::TimeWindow(_)))
    }

    pub fn check_route(&self, context: &RouteInsertionContext) -> Result<(), &'static str> {
        match self
            .route_constraints
            .iter()
            .find(|constraint| !constraint.fulfilled(context))
        {
            Some(constraint) => Err(constraint.code()),
            None => Ok(()),
        }
    }

    pub fn check_activity(&self, context: &ActivityInsertionContext) -> Result<(), &'static str> {
        match self
            .activity_constraints
            .iter()
            .find(|constraint| !constraint.fulfilled(context))
        {
            Some(constraint) => Err(constraint.code()),
            None => Ok(()),
        }
    }

    /// Validates a refreshed route as it is, used before moving a route to another vehicle.
    pub fn check_existing_route(
        &self,
        problem: &VehicleRoutingProblem,
        states: &StateManager,
        route: &WorkingSolutionRoute,
    ) -> Result<(), &'static str> {
        if let Some(constraint) = self
            .route_constraints
            .iter()
            .find(|constraint| !constraint.route_fulfilled(problem, states, route))
        {
            return Err(constraint.code());
        }

        let late = states
            .route_state(route, states.core().late)
            .copied()
            .unwrap_or(false);
        if self.has_time_window_constraint() && late {
            return Err(TIME_WINDOW);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::{
            amount::Amount,
            service::{ServiceBuilder, ServiceType},
            vehicle::VehicleBuilder,
            vehicle_routing_problem::VehicleRoutingProblemBuilder,
        },
        solver::{
            constraints::{
                capacity_constraint::CAPACITY, route_constraint::CustomRouteConstraint,
                skills_constraint::SKILLS,
            },
            solution::working_solution::WorkingSolution,
        },
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_check_route_reports_first_failure() {
        let mut skilled = ServiceBuilder::new("skilled", 1);
        skilled
            .set_skills(vec!["fridge".to_owned()])
            .set_demand(Amount::from_vec(vec![1.0]));
        let mut heavy = ServiceBuilder::new("heavy", 2);
        heavy.set_demand(Amount::from_vec(vec![6.0]));
        let mut delivery = ServiceBuilder::new("delivery", 3);
        delivery
            .set_service_type(ServiceType::Delivery)
            .set_demand(Amount::from_vec(vec![4.0]));

        let mut vehicle = VehicleBuilder::new("v1", 0);
        vehicle.set_capacity(Amount::from_vec(vec![5.0]));

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(2, 2))
            .add_service(skilled.build())
            .add_service(heavy.build())
            .add_service(delivery.build())
            .add_vehicle(vehicle.build());
        let problem = Arc::new(builder.build().unwrap());

        let states = StateManager::new();
        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        states.refresh_solution(&mut solution);

        let constraints = HardConstraints::with_default_constraints();
        let context = |job_id: usize| RouteInsertionContext {
            problem: &problem,
            states: &states,
            route: &solution.routes()[0],
            vehicle_id: 0.into(),
            job_id: job_id.into(),
        };

        assert_eq!(constraints.check_route(&context(0)), Err(SKILLS));
        assert_eq!(constraints.check_route(&context(1)), Err(CAPACITY));
        assert_eq!(constraints.check_route(&context(2)), Ok(()));
    }

    #[test]
    fn test_custom_route_constraint() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let states = StateManager::new();
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );
        states.refresh_solution(&mut solution);

        let mut constraints = HardConstraints::with_default_constraints();
        constraints.add_route_constraint(RouteConstraintType::Custom(
            CustomRouteConstraint::from_fn("max_one_job", |context| context.route.num_jobs() < 1),
        ));

        let context = RouteInsertionContext {
            problem: &problem,
            states: &states,
            route: &solution.routes()[0],
            vehicle_id: 0.into(),
            job_id: 1.into(),
        };
        assert_eq!(constraints.check_route(&context), Err("max_one_job"));
        assert_eq!(
            constraints.check_existing_route(&problem, &states, &solution.routes()[0]),
            Ok(())
        );
    }
}
