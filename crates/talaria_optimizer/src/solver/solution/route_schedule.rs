use crate::{
    problem::{
        location::LocationIdx, travel_cost_matrix::Cost, vehicle::Vehicle,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::solution::tour_activity::TourActivity,
};

/// Position of a vehicle right after it left a stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleCursor {
    pub location: LocationIdx,
    pub departure: f64,
    pub cost: Cost,
}

/// Outcome of driving from a cursor to the next activity and serving it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleStep {
    /// Where the activity takes place, inherited from the cursor for location-less activities.
    pub location: LocationIdx,
    pub arrival: f64,
    /// Arrival plus setup, the earliest moment the operation can start.
    pub ready: f64,
    /// `None` when the vehicle is ready after every time window of the activity closed.
    pub operation_start: Option<f64>,
    pub end: f64,
    pub transport_cost: Cost,
    pub activity_cost: Cost,
    pub distance: f64,
    pub waiting: f64,
    pub cost_so_far: Cost,
}

impl ScheduleCursor {
    pub fn at_start(vehicle: &Vehicle) -> Self {
        ScheduleCursor {
            location: vehicle.start_location_id(),
            departure: vehicle.earliest_start(),
            cost: 0.0,
        }
    }

    pub fn advance(
        &self,
        problem: &VehicleRoutingProblem,
        vehicle: &Vehicle,
        activity: &TourActivity,
    ) -> ScheduleStep {
        let to = activity.location_id().unwrap_or(self.location);
        let transport_costs = problem.transport_costs();

        let travel_time = transport_costs.transport_time(self.location, to, self.departure, vehicle);
        let transport_cost =
            transport_costs.transport_cost(self.location, to, self.departure, vehicle);
        let distance = transport_costs.distance(self.location, to, self.departure);

        let arrival = self.departure + travel_time;
        let setup = if to != self.location {
            activity.setup_duration()
        } else {
            0.0
        };
        let ready = arrival + setup;

        let operation_start = activity.time_windows().operation_start(ready);
        let started = operation_start.unwrap_or(ready);
        let activity_cost = problem
            .activity_costs()
            .activity_cost(activity, ready, vehicle);

        ScheduleStep {
            location: to,
            arrival,
            ready,
            operation_start,
            end: started + activity.operation_time(),
            transport_cost,
            activity_cost,
            distance,
            waiting: started - ready,
            cost_so_far: self.cost + transport_cost + activity_cost,
        }
    }
}

impl ScheduleStep {
    pub fn cursor(&self) -> ScheduleCursor {
        ScheduleCursor {
            location: self.location,
            departure: self.end,
            cost: self.cost_so_far,
        }
    }

    pub fn is_late(&self) -> bool {
        self.operation_start.is_none()
    }
}
