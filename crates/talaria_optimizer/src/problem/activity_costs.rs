use crate::{
    problem::{travel_cost_matrix::Cost, vehicle::Vehicle},
    solver::solution::tour_activity::TourActivity,
};

/// Finite stand-in for "infeasible": large enough to lose every comparison, small enough to be
/// summed without overflowing.
pub const INFEASIBLE_ACTIVITY_COST: Cost = 1e12;

/// Cost incurred at an activity for a given arrival time.
pub trait ActivityCosts: Send + Sync {
    fn activity_cost(&self, activity: &TourActivity, arrival_time: f64, vehicle: &Vehicle) -> Cost;
}

/// Charges waiting before the time window opens, and the infeasible sentinel when the arrival is
/// after every window of the activity.
#[derive(Default)]
pub struct WaitingActivityCosts;

impl ActivityCosts for WaitingActivityCosts {
    fn activity_cost(&self, activity: &TourActivity, arrival_time: f64, vehicle: &Vehicle) -> Cost {
        match activity.time_windows().operation_start(arrival_time) {
            Some(start) => vehicle.costs().per_waiting * (start - arrival_time),
            None => INFEASIBLE_ACTIVITY_COST,
        }
    }
}

/// Like [`WaitingActivityCosts`] but late arrivals cost `per_lateness` per time unit instead of
/// being infeasible.
#[derive(Default)]
pub struct SoftTimeWindowActivityCosts;

impl ActivityCosts for SoftTimeWindowActivityCosts {
    fn activity_cost(&self, activity: &TourActivity, arrival_time: f64, vehicle: &Vehicle) -> Cost {
        let costs = vehicle.costs();
        match activity.time_windows().operation_start(arrival_time) {
            Some(start) => costs.per_waiting * (start - arrival_time),
            None => costs.per_lateness * (arrival_time - activity.time_windows().latest()),
        }
    }
}
