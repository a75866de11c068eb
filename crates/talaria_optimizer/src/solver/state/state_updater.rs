use crate::{
    problem::{vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{solution::tour_activity::TourActivity, state::route_states::RouteStates},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOrder {
    /// From `Start` to `End`.
    Forward,
    /// From `End` to `Start`.
    Backward,
}

/// Computes derived states of a route by visiting its activities in order.
///
/// Updaters run in registration order, so an updater may read states written by the ones
/// registered before it.
pub trait StateUpdater: Send + Sync {
    fn name(&self) -> &'static str;

    fn order(&self) -> VisitOrder {
        VisitOrder::Forward
    }

    fn visitor<'a>(
        &'a self,
        problem: &'a VehicleRoutingProblem,
        vehicle_id: VehicleIdx,
    ) -> Box<dyn ActivityVisitor + 'a>;
}

pub trait ActivityVisitor {
    fn begin(&mut self, _activities: &[TourActivity], _states: &mut RouteStates) {}

    fn visit(&mut self, position: usize, activity: &mut TourActivity, states: &mut RouteStates);

    fn finish(&mut self, _states: &mut RouteStates) {}
}
