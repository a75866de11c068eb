use crate::{
    problem::{
        location::LocationIdx,
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        solution::tour_activity::TourActivity,
        state::{
            route_states::RouteStates,
            state_manager::CoreStates,
            state_updater::{ActivityVisitor, StateUpdater, VisitOrder},
        },
    },
};

/// Backward pass bounding the operation start of every activity: starting later than
/// `latest_start` makes the activity or one of its successors miss its time windows.
///
/// Runs after the schedule updater, it reads effective locations and end times.
pub struct LatestStartUpdater {
    states: CoreStates,
}

impl LatestStartUpdater {
    pub fn new(states: CoreStates) -> Self {
        LatestStartUpdater { states }
    }
}

impl StateUpdater for LatestStartUpdater {
    fn name(&self) -> &'static str {
        "latest_start"
    }

    fn order(&self) -> VisitOrder {
        VisitOrder::Backward
    }

    fn visitor<'a>(
        &'a self,
        problem: &'a VehicleRoutingProblem,
        vehicle_id: VehicleIdx,
    ) -> Box<dyn ActivityVisitor + 'a> {
        Box::new(LatestStartVisitor {
            problem,
            vehicle: problem.vehicle(vehicle_id),
            states: self.states,
            next: None,
        })
    }
}

#[derive(Clone, Copy)]
struct NextStop {
    location: Option<LocationIdx>,
    setup_duration: f64,
    latest_start: f64,
}

struct LatestStartVisitor<'a> {
    problem: &'a VehicleRoutingProblem,
    vehicle: &'a Vehicle,
    states: CoreStates,
    next: Option<NextStop>,
}

impl ActivityVisitor for LatestStartVisitor<'_> {
    fn visit(&mut self, position: usize, activity: &mut TourActivity, states: &mut RouteStates) {
        let own_latest = activity.theoretical_latest_start();

        let latest_start = match self.next {
            None => own_latest,
            Some(next) => {
                let from = states
                    .activity(self.states.effective_location, position)
                    .copied()
                    .unwrap_or(self.vehicle.start_location_id());
                let to = next.location.unwrap_or(from);

                let travel_time = self.problem.transport_costs().transport_time(
                    from,
                    to,
                    activity.end_time(),
                    self.vehicle,
                );
                let setup = if to != from { next.setup_duration } else { 0.0 };

                own_latest
                    .min(next.latest_start - setup - travel_time - activity.operation_time())
            }
        };

        states.put_activity(self.states.latest_start, position, latest_start);
        self.next = Some(NextStop {
            location: activity.location_id(),
            setup_duration: activity.setup_duration(),
            latest_start,
        });
    }
}
