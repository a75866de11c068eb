use crate::{
    problem::amount::{Amount, ZERO_AMOUNT},
    solver::{
        insertion_context::ActivityInsertionContext, solution::tour_activity::ActivityKind,
        state::state_id::StateId,
    },
};

use super::{activity_constraint::HardActivityConstraint, capacity_constraint::CAPACITY};

/// The load must fit in the vehicle at every activity once the new activity is added.
#[derive(Clone, Default)]
pub struct LoadConstraint;

impl HardActivityConstraint for LoadConstraint {
    fn code(&self) -> &'static str {
        CAPACITY
    }

    fn fulfilled(&self, context: &ActivityInsertionContext) -> bool {
        let load_change = context.activity.load_change();
        if load_change.is_empty() {
            return true;
        }

        let capacity = context.vehicle().capacity();
        let states = context.states();
        let core = states.core();
        let route = context.route.route;
        let state_at = |id: StateId<Amount>, position: Option<usize>| {
            position
                .and_then(|position| states.activity_state(route, id, position))
                .unwrap_or(&ZERO_AMOUNT)
        };

        match context.activity.kind() {
            ActivityKind::PickupService(_) => {
                (state_at(core.future_max_load, context.prev_position) + load_change)
                    .fits_in(capacity)
            }
            ActivityKind::DeliveryService(_) => {
                (state_at(core.past_max_load, context.prev_position) - load_change)
                    .fits_in(capacity)
            }
            ActivityKind::PickupShipment(_) => {
                (state_at(core.load, context.prev_position) + load_change).fits_in(capacity)
            }
            ActivityKind::DeliverShipment(_) => context
                .load_between
                .is_none_or(|load_between| (load_between - load_change).fits_in(capacity)),
            ActivityKind::Start | ActivityKind::End | ActivityKind::Break(_) => true,
        }
    }
}
