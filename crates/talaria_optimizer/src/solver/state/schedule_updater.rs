use crate::{
    problem::{
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        solution::{route_schedule::ScheduleCursor, tour_activity::TourActivity},
        state::{
            route_states::RouteStates,
            state_manager::CoreStates,
            state_updater::{ActivityVisitor, StateUpdater},
        },
    },
};

/// Forward pass computing arrival and end times of every activity, the accumulated cost and the
/// route totals.
pub struct ScheduleUpdater {
    states: CoreStates,
}

impl ScheduleUpdater {
    pub fn new(states: CoreStates) -> Self {
        ScheduleUpdater { states }
    }
}

impl StateUpdater for ScheduleUpdater {
    fn name(&self) -> &'static str {
        "schedule"
    }

    fn visitor<'a>(
        &'a self,
        problem: &'a VehicleRoutingProblem,
        vehicle_id: VehicleIdx,
    ) -> Box<dyn ActivityVisitor + 'a> {
        let vehicle = problem.vehicle(vehicle_id);
        Box::new(ScheduleVisitor {
            problem,
            vehicle,
            states: self.states,
            cursor: ScheduleCursor::at_start(vehicle),
            has_jobs: false,
            late: false,
            transport_cost: 0.0,
            activity_cost: 0.0,
            distance: 0.0,
            waiting: 0.0,
        })
    }
}

struct ScheduleVisitor<'a> {
    problem: &'a VehicleRoutingProblem,
    vehicle: &'a Vehicle,
    states: CoreStates,
    cursor: ScheduleCursor,
    has_jobs: bool,
    late: bool,
    transport_cost: f64,
    activity_cost: f64,
    distance: f64,
    waiting: f64,
}

impl ActivityVisitor for ScheduleVisitor<'_> {
    fn begin(&mut self, activities: &[TourActivity], _states: &mut RouteStates) {
        self.has_jobs = activities.len() > 2;
    }

    fn visit(&mut self, position: usize, activity: &mut TourActivity, states: &mut RouteStates) {
        if activity.kind().is_start() {
            self.cursor = ScheduleCursor::at_start(self.vehicle);
            activity.arrival_time = self.cursor.departure;
            activity.end_time = self.cursor.departure;
        } else {
            let step = self.cursor.advance(self.problem, self.vehicle, activity);
            activity.arrival_time = step.arrival;
            activity.end_time = step.end;

            self.transport_cost += step.transport_cost;
            self.activity_cost += step.activity_cost;
            self.distance += step.distance;
            self.waiting += step.waiting;
            self.late |= step.is_late();
            self.cursor = step.cursor();
        }

        states.put_activity(self.states.cost_so_far, position, self.cursor.cost);
        states.put_activity(self.states.effective_location, position, self.cursor.location);
    }

    fn finish(&mut self, states: &mut RouteStates) {
        let cost = if self.has_jobs {
            self.cursor.cost + self.vehicle.costs().fixed
        } else {
            0.0
        };

        states.put_route(self.states.cost, cost);
        states.put_route(self.states.transport_cost, self.transport_cost);
        states.put_route(self.states.activity_cost, self.activity_cost);
        states.put_route(self.states.distance, self.distance);
        states.put_route(self.states.waiting, self.waiting);
        states.put_route(self.states.late, self.late);
        states.put_route(
            self.states.duration,
            self.cursor.departure - self.vehicle.earliest_start(),
        );
    }
}
