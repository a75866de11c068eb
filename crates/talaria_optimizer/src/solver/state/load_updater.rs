use crate::{
    problem::{amount::Amount, vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        solution::tour_activity::{ActivityKind, TourActivity},
        state::{
            route_states::RouteStates,
            state_manager::CoreStates,
            state_updater::{ActivityVisitor, StateUpdater, VisitOrder},
        },
    },
};

/// Load after each activity and the running maximum from the start of the route.
///
/// Delivery services are loaded at the depot, so the route starts with the sum of their demands.
pub struct LoadUpdater {
    states: CoreStates,
}

impl LoadUpdater {
    pub fn new(states: CoreStates) -> Self {
        LoadUpdater { states }
    }
}

impl StateUpdater for LoadUpdater {
    fn name(&self) -> &'static str {
        "load"
    }

    fn visitor<'a>(
        &'a self,
        _problem: &'a VehicleRoutingProblem,
        _vehicle_id: VehicleIdx,
    ) -> Box<dyn ActivityVisitor + 'a> {
        Box::new(LoadVisitor {
            states: self.states,
            beginning: Amount::empty(),
            current: Amount::empty(),
            past_max: Amount::empty(),
        })
    }
}

struct LoadVisitor {
    states: CoreStates,
    beginning: Amount,
    current: Amount,
    past_max: Amount,
}

impl ActivityVisitor for LoadVisitor {
    fn begin(&mut self, activities: &[TourActivity], _states: &mut RouteStates) {
        for activity in activities {
            if let ActivityKind::DeliveryService(_) = activity.kind() {
                self.beginning -= activity.load_change();
            }
        }

        self.current = self.beginning.clone();
        self.past_max = self.beginning.clone();
    }

    fn visit(&mut self, position: usize, activity: &mut TourActivity, states: &mut RouteStates) {
        self.current += activity.load_change();
        self.past_max = self.past_max.max(&self.current);

        states.put_activity(self.states.load, position, self.current.clone());
        states.put_activity(self.states.past_max_load, position, self.past_max.clone());
    }

    fn finish(&mut self, states: &mut RouteStates) {
        states.put_route(self.states.load_at_beginning, self.beginning.clone());
        states.put_route(self.states.load_at_end, self.current.clone());
        states.put_route(self.states.max_load, self.past_max.clone());
    }
}

/// Maximum load from each activity to the end of the route.
pub struct FutureLoadUpdater {
    states: CoreStates,
}

impl FutureLoadUpdater {
    pub fn new(states: CoreStates) -> Self {
        FutureLoadUpdater { states }
    }
}

impl StateUpdater for FutureLoadUpdater {
    fn name(&self) -> &'static str {
        "future_load"
    }

    fn order(&self) -> VisitOrder {
        VisitOrder::Backward
    }

    fn visitor<'a>(
        &'a self,
        _problem: &'a VehicleRoutingProblem,
        _vehicle_id: VehicleIdx,
    ) -> Box<dyn ActivityVisitor + 'a> {
        Box::new(FutureLoadVisitor {
            states: self.states,
            future_max: Amount::empty(),
        })
    }
}

struct FutureLoadVisitor {
    states: CoreStates,
    future_max: Amount,
}

impl ActivityVisitor for FutureLoadVisitor {
    fn visit(&mut self, position: usize, _activity: &mut TourActivity, states: &mut RouteStates) {
        if let Some(load) = states.activity(self.states.load, position) {
            self.future_max = self.future_max.max(load);
        }

        states.put_activity(self.states.future_max_load, position, self.future_max.clone());
    }
}
