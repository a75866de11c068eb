use smallvec::{SmallVec, smallvec};

use crate::{
    problem::{
        amount::Amount,
        job::{Job, JobIdx},
        travel_cost_matrix::Cost,
        vehicle::Vehicle,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        constraints::{hard_constraints::HardConstraints, time_window_constraint::TIME_WINDOW},
        insertion::{Insertion, ShipmentInsertion, SingleInsertion},
        insertion_context::{ActivityInsertionContext, RouteInsertionContext},
        solution::{
            route::WorkingSolutionRoute,
            route_id::RouteIdx,
            route_schedule::{ScheduleCursor, ScheduleStep},
            tour_activity::TourActivity,
        },
        state::state_manager::StateManager,
    },
};

/// Slack absorbing rounding when comparing times against backward computed bounds.
const TIME_EPSILON: f64 = 1e-6;

/// Codes of the constraints that rejected a job on a route, each one listed once.
pub type FailureCodes = SmallVec<[&'static str; 2]>;

/// Cheapest feasible position of a job in a route, or every constraint that rejected a position.
pub type RouteEvaluation = Result<Insertion, FailureCodes>;

pub fn add_failure(failures: &mut FailureCodes, code: &'static str) {
    if !failures.contains(&code) {
        failures.push(code);
    }
}

/// Finds the cheapest feasible insertion of a job into one refreshed route.
///
/// The marginal cost of a position is obtained by simulating the route from the activity before
/// the insertion point until the schedule meets the unchanged one again.
pub struct InsertionEvaluator<'a> {
    problem: &'a VehicleRoutingProblem,
    states: &'a StateManager,
    constraints: &'a HardConstraints,
    check_time_windows: bool,
}

struct RouteScan<'a> {
    context: RouteInsertionContext<'a>,
    vehicle: &'a Vehicle,
    /// Cost of using an empty route.
    fixed_cost: Cost,
}

impl<'a> InsertionEvaluator<'a> {
    pub fn new(
        problem: &'a VehicleRoutingProblem,
        states: &'a StateManager,
        constraints: &'a HardConstraints,
    ) -> Self {
        InsertionEvaluator {
            problem,
            states,
            constraints,
            check_time_windows: constraints.has_time_window_constraint(),
        }
    }

    pub fn problem(&self) -> &'a VehicleRoutingProblem {
        self.problem
    }

    pub fn states(&self) -> &'a StateManager {
        self.states
    }

    pub fn constraints(&self) -> &'a HardConstraints {
        self.constraints
    }

    /// Evaluates `job_id` on `route`, identified as `route_id` in the solution. `route` may be a
    /// copy of the solution route already moved to another vehicle, `extra_cost` is then the cost
    /// of that move.
    pub fn evaluate(
        &self,
        route_id: RouteIdx,
        route: &WorkingSolutionRoute,
        job_id: JobIdx,
        extra_cost: Cost,
    ) -> RouteEvaluation {
        let vehicle_id = route.vehicle_id();
        let context = RouteInsertionContext {
            problem: self.problem,
            states: self.states,
            route,
            vehicle_id,
            job_id,
        };
        self.constraints
            .check_route(&context)
            .map_err(|code| -> FailureCodes { smallvec![code] })?;

        let vehicle = self.problem.vehicle(vehicle_id);
        let scan = RouteScan {
            context,
            vehicle,
            fixed_cost: if route.is_empty() {
                vehicle.costs().fixed
            } else {
                0.0
            },
        };

        let activities = TourActivity::for_job(self.problem, job_id);
        match self.problem.job(job_id) {
            Job::Shipment(_) => {
                self.evaluate_shipment(&scan, route_id, &activities[0], &activities[1], extra_cost)
            }
            Job::Service(_) | Job::Break(_) => {
                self.evaluate_single(&scan, route_id, &activities[0], extra_cost)
            }
        }
    }

    fn evaluate_single(
        &self,
        scan: &RouteScan,
        route_id: RouteIdx,
        activity: &TourActivity,
        extra_cost: Cost,
    ) -> RouteEvaluation {
        let route = scan.context.route;
        let mut best: Option<(Cost, usize)> = None;
        let mut failures = FailureCodes::new();

        for position in 1..=route.end_position() {
            let step = self.cursor_at(route, position - 1).advance(
                self.problem,
                scan.vehicle,
                activity,
            );

            let activity_context = ActivityInsertionContext {
                route: &scan.context,
                prev: route.activity(position - 1),
                prev_position: Some(position - 1),
                activity,
                next: route.activity(position),
                next_position: Some(position),
                step: &step,
                load_between: None,
            };
            if let Err(code) = self.constraints.check_activity(&activity_context) {
                add_failure(&mut failures, code);
                continue;
            }

            let Some(delta) = self.propagate(scan, step.cursor(), position) else {
                add_failure(&mut failures, TIME_WINDOW);
                continue;
            };

            let cost = delta + scan.fixed_cost + extra_cost;
            if best.is_none_or(|(best_cost, _)| cost < best_cost) {
                best = Some((cost, position));
            }
        }

        match best {
            Some((cost, position)) => Ok(Insertion::Single(SingleInsertion {
                route_id,
                job_index: scan.context.job_id,
                position,
                vehicle_id: scan.context.vehicle_id,
                cost,
            })),
            None => Err(failures),
        }
    }

    fn evaluate_shipment(
        &self,
        scan: &RouteScan,
        route_id: RouteIdx,
        pickup: &TourActivity,
        delivery: &TourActivity,
        extra_cost: Cost,
    ) -> RouteEvaluation {
        let route = scan.context.route;
        let core = self.states.core();
        let end_position = route.end_position();

        let mut best: Option<(Cost, usize, usize)> = None;
        let mut failures = FailureCodes::new();

        for pickup_position in 1..=end_position {
            let pickup_step = self.cursor_at(route, pickup_position - 1).advance(
                self.problem,
                scan.vehicle,
                pickup,
            );

            let pickup_context = ActivityInsertionContext {
                route: &scan.context,
                prev: route.activity(pickup_position - 1),
                prev_position: Some(pickup_position - 1),
                activity: pickup,
                next: route.activity(pickup_position),
                // The delivery may come right after the pickup
                next_position: None,
                step: &pickup_step,
                load_between: None,
            };
            if let Err(code) = self.constraints.check_activity(&pickup_context) {
                add_failure(&mut failures, code);
                continue;
            }

            let mut cursor = pickup_step.cursor();
            let mut load_between = self
                .states
                .activity_state(route, core.load, pickup_position - 1)
                .cloned()
                .unwrap_or_else(Amount::empty);

            for delivery_position in pickup_position..=end_position {
                let (prev, prev_position) = if delivery_position == pickup_position {
                    (pickup, None)
                } else {
                    // Walk the activity between the pickup and this delivery position
                    let between_position = delivery_position - 1;
                    let between = route.activity(between_position);
                    let step = cursor.advance(self.problem, scan.vehicle, between);
                    if self.violates_time_windows(route, between_position, &step) {
                        add_failure(&mut failures, TIME_WINDOW);
                        break;
                    }

                    cursor = step.cursor();
                    if let Some(load) = self.states.activity_state(route, core.load, between_position)
                    {
                        load_between = load_between.max(load);
                    }

                    (between, Some(between_position))
                };

                let delivery_step = cursor.advance(self.problem, scan.vehicle, delivery);
                let delivery_context = ActivityInsertionContext {
                    route: &scan.context,
                    prev,
                    prev_position,
                    activity: delivery,
                    next: route.activity(delivery_position),
                    next_position: Some(delivery_position),
                    step: &delivery_step,
                    load_between: Some(&load_between),
                };
                if let Err(code) = self.constraints.check_activity(&delivery_context) {
                    add_failure(&mut failures, code);
                    continue;
                }

                let Some(delta) = self.propagate(scan, delivery_step.cursor(), delivery_position)
                else {
                    add_failure(&mut failures, TIME_WINDOW);
                    continue;
                };

                let cost = delta + scan.fixed_cost + extra_cost;
                if best.is_none_or(|(best_cost, _, _)| cost < best_cost) {
                    best = Some((cost, pickup_position, delivery_position));
                }
            }
        }

        match best {
            Some((cost, pickup_position, delivery_position)) => {
                Ok(Insertion::Shipment(ShipmentInsertion {
                    route_id,
                    job_index: scan.context.job_id,
                    pickup_position,
                    delivery_position,
                    vehicle_id: scan.context.vehicle_id,
                    cost,
                }))
            }
            None => Err(failures),
        }
    }

    /// Vehicle state right after the activity at `position` in the current schedule.
    fn cursor_at(&self, route: &WorkingSolutionRoute, position: usize) -> ScheduleCursor {
        let core = self.states.core();
        let activity = route.activity(position);

        ScheduleCursor {
            location: self
                .states
                .activity_state(route, core.effective_location, position)
                .copied()
                .or(activity.location_id())
                .unwrap_or(route.vehicle(self.problem).start_location_id()),
            departure: activity.end_time(),
            cost: self
                .states
                .activity_state(route, core.cost_so_far, position)
                .copied()
                .unwrap_or(0.0),
        }
    }

    fn violates_time_windows(
        &self,
        route: &WorkingSolutionRoute,
        position: usize,
        step: &ScheduleStep,
    ) -> bool {
        if !self.check_time_windows {
            return false;
        }

        match step.operation_start {
            None => true,
            Some(operation_start) => self
                .states
                .activity_state(route, self.states.core().latest_start, position)
                .is_some_and(|&latest_start| operation_start > latest_start + TIME_EPSILON),
        }
    }

    /// Replays the route from `from_position` with the vehicle leaving the inserted activity as
    /// `cursor`. Returns the cost difference with the current schedule, `None` when a later
    /// activity misses its time windows.
    fn propagate(&self, scan: &RouteScan, cursor: ScheduleCursor, from_position: usize) -> Option<Cost> {
        let route = scan.context.route;
        let core = self.states.core();
        let is_empty = route.is_empty();

        let mut cursor = cursor;
        for position in from_position..=route.end_position() {
            let activity = route.activity(position);
            let step = cursor.advance(self.problem, scan.vehicle, activity);

            if self.violates_time_windows(route, position, &step) {
                return None;
            }

            let old_cost = self
                .states
                .activity_state(route, core.cost_so_far, position)
                .copied()
                .unwrap_or(0.0);

            if !is_empty {
                let old_location = self
                    .states
                    .activity_state(route, core.effective_location, position)
                    .copied();
                if step.end == activity.end_time() && Some(step.location) == old_location {
                    return Some(step.cost_so_far - old_cost);
                }
            }

            cursor = step.cursor();
            if position == route.end_position() {
                return Some(cursor.cost - if is_empty { 0.0 } else { old_cost });
            }
        }

        Some(cursor.cost)
    }
}

/// Lowest cost first, then lowest route index, then earliest positions.
pub fn compare_insertions(a: &Insertion, b: &Insertion) -> std::cmp::Ordering {
    a.cost()
        .total_cmp(&b.cost())
        .then(a.route_id().cmp(&b.route_id()))
        .then(a.positions().cmp(&b.positions()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::{
            amount::Amount,
            service::ServiceBuilder,
            shipment::{ShipmentBuilder, ShipmentTask},
            time_window::TimeWindows,
            vehicle::VehicleBuilder,
            vehicle_routing_problem::VehicleRoutingProblemBuilder,
        },
        solver::{
            constraints::capacity_constraint::CAPACITY,
            solution::working_solution::WorkingSolution,
        },
        test_utils::{self, TestRoute},
    };

    use super::*;

    fn evaluate(solution: &mut WorkingSolution, job_id: usize) -> RouteEvaluation {
        let states = StateManager::new();
        states.refresh_solution(solution);
        let constraints = HardConstraints::with_default_constraints();
        let evaluator = InsertionEvaluator::new(solution.problem(), &states, &constraints);

        evaluator.evaluate(0.into(), solution.route(0.into()), job_id.into(), 0.0)
    }

    #[test]
    fn test_service_insertion_cost_and_position() {
        // Services on a line: 1, 2 in the route, 3 to insert
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 5),
            test_utils::create_basic_services(vec![1, 3, 2]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1],
            }],
        );

        let insertion = evaluate(&mut solution, 2).unwrap();
        assert_eq!(insertion.positions(), (2, 2));
        assert_eq!(insertion.cost(), 0.0);
    }

    #[test]
    fn test_empty_route_insertion_cost() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![4]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = WorkingSolution::new(Arc::clone(&problem));

        let insertion = evaluate(&mut solution, 0).unwrap();
        assert!((insertion.cost() - 2.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_time_window_rejects_late_positions() {
        let mut first = ServiceBuilder::new("first", 1);
        first.set_duration(1.0);
        let mut early = ServiceBuilder::new("early", 4);
        early.set_time_windows(TimeWindows::single(0.0, 4.5));

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(1, 5))
            .add_service(first.build())
            .add_service(early.build())
            .add_vehicle(VehicleBuilder::new("v1", 0).build());
        let problem = Arc::new(builder.build().unwrap());

        // After "first" the vehicle reaches 4 at 5.0
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );
        let insertion = evaluate(&mut solution, 1).unwrap();
        assert_eq!(insertion.positions(), (1, 1));
        assert_eq!(insertion.cost(), 6.0);

        let mut late = ServiceBuilder::new("late", 4);
        late.set_time_windows(TimeWindows::single(0.0, 3.0));
        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(1, 5))
            .add_service(late.build())
            .add_vehicle(VehicleBuilder::new("v1", 0).build());
        let problem = Arc::new(builder.build().unwrap());
        let mut solution = WorkingSolution::new(problem);

        assert_eq!(evaluate(&mut solution, 0), Err(smallvec![TIME_WINDOW]));
    }

    #[test]
    fn test_downstream_time_window_is_checked() {
        let mut tight = ServiceBuilder::new("tight", 1);
        tight.set_time_windows(TimeWindows::single(0.0, 1.0));

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(1, 5))
            .add_service(tight.build())
            .add_service(ServiceBuilder::new("far", 4).build())
            .add_vehicle(VehicleBuilder::new("v1", 0).build());
        let problem = Arc::new(builder.build().unwrap());
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );

        // Visiting "far" first would make "tight" late
        let insertion = evaluate(&mut solution, 1).unwrap();
        assert_eq!(insertion.positions(), (2, 2));
        assert_eq!(insertion.cost(), 6.0);
    }

    /// Open route from 0 with a service at 2 and a shipment from 1 to 3, `demands` being the
    /// shipment and service demands.
    fn open_route_problem(demands: Option<(f64, f64)>) -> Arc<VehicleRoutingProblem> {
        let mut shipment =
            ShipmentBuilder::new("shipment", ShipmentTask::new(1), ShipmentTask::new(3));
        let mut service = ServiceBuilder::new("s1", 2);
        let mut vehicle = VehicleBuilder::new("v1", 0);
        vehicle.set_return(false);

        if let Some((shipment_demand, service_demand)) = demands {
            shipment.set_demand(Amount::from_vec(vec![shipment_demand]));
            service.set_demand(Amount::from_vec(vec![service_demand]));
            vehicle.set_capacity(Amount::from_vec(vec![3.0]));
        }

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(1, 5))
            .add_service(service.build())
            .add_shipment(shipment.build())
            .add_vehicle(vehicle.build());
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_shipment_insertion_order() {
        let problem = open_route_problem(None);
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );

        // 0 -> 1 -> 2 -> 3 instead of 0 -> 2
        let insertion = evaluate(&mut solution, 1).unwrap();
        assert_eq!(insertion.positions(), (1, 2));
        assert_eq!(insertion.cost(), 1.0);
    }

    #[test]
    fn test_shipment_capacity() {
        let problem = open_route_problem(Some((2.0, 2.0)));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );

        // The shipment must be delivered before the pickup service loads the vehicle
        let insertion = evaluate(&mut solution, 1).unwrap();
        assert_eq!(insertion.positions(), (1, 1));
        assert_eq!(insertion.cost(), 2.0);

        let problem = open_route_problem(Some((4.0, 0.0)));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );
        assert_eq!(evaluate(&mut solution, 1), Err(smallvec![CAPACITY]));
    }

    #[test]
    fn test_every_rejecting_constraint_is_reported() {
        let mut shipment = ShipmentBuilder::new(
            "shipment",
            ShipmentTask::new(1),
            ShipmentTask::new(3).with_time_windows(TimeWindows::single(0.0, 2.5)),
        );
        shipment.set_demand(Amount::from_vec(vec![2.0]));
        let mut service = ServiceBuilder::new("s1", 2);
        service.set_demand(Amount::from_vec(vec![2.0]));
        let mut vehicle = VehicleBuilder::new("v1", 0);
        vehicle.set_return(false);
        vehicle.set_capacity(Amount::from_vec(vec![3.0]));

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(1, 5))
            .add_service(service.build())
            .add_shipment(shipment.build())
            .add_vehicle(vehicle.build());
        let problem = Arc::new(builder.build().unwrap());
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );

        // Delivering right after the pickup is late, every later position overloads the vehicle
        let failures = evaluate(&mut solution, 1).unwrap_err();
        assert_eq!(failures.as_slice(), &[TIME_WINDOW, CAPACITY]);
    }
}
