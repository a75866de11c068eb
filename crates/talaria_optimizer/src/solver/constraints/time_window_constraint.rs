use crate::solver::insertion_context::ActivityInsertionContext;

use super::activity_constraint::HardActivityConstraint;

pub const TIME_WINDOW: &str = "time_window";

/// The new activity must start within one of its time windows, and the vehicle must still reach
/// the next activity early enough for the rest of the route.
///
/// Registering it also makes the insertion evaluator reject insertions that push a later
/// activity past its time windows.
#[derive(Clone, Default)]
pub struct TimeWindowConstraint;

impl HardActivityConstraint for TimeWindowConstraint {
    fn code(&self) -> &'static str {
        TIME_WINDOW
    }

    fn fulfilled(&self, context: &ActivityInsertionContext) -> bool {
        let step = context.step;
        if step.is_late() {
            return false;
        }

        let Some(next_position) = context.next_position else {
            return true;
        };

        let states = context.states();
        let Some(&latest_start) =
            states.activity_state(context.route.route, states.core().latest_start, next_position)
        else {
            return true;
        };

        let to = context.next.location_id().unwrap_or(step.location);
        let travel_time = context.problem().transport_costs().transport_time(
            step.location,
            to,
            step.end,
            context.vehicle(),
        );
        let setup = if to != step.location {
            context.next.setup_duration()
        } else {
            0.0
        };

        step.end + travel_time + setup <= latest_start
    }
}
