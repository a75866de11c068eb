use crate::solver::state::{
    state_id::StateId,
    state_value::{StateType, StateValue},
};

/// Cached state of one route.
///
/// Any structural change of the route marks it dirty; the cache is only readable through the
/// [`StateManager`](super::state_manager::StateManager) once the route has been refreshed.
#[derive(Debug, Clone)]
pub struct RouteStates {
    dirty: bool,
    route: Vec<Option<StateValue>>,
    // [state][position]
    activities: Vec<Vec<Option<StateValue>>>,
}

impl Default for RouteStates {
    fn default() -> Self {
        RouteStates {
            dirty: true,
            route: Vec::new(),
            activities: Vec::new(),
        }
    }
}

impl RouteStates {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn reset(&mut self, num_states: usize, num_activities: usize) {
        self.route.clear();
        self.route.resize(num_states, None);

        self.activities.resize_with(num_states, Vec::new);
        for values in &mut self.activities {
            values.clear();
            values.resize(num_activities, None);
        }
    }

    pub fn put_route<T: StateType>(&mut self, id: StateId<T>, value: T) {
        if id.index() >= self.route.len() {
            self.route.resize(id.index() + 1, None);
        }
        self.route[id.index()] = Some(value.into_value());
    }

    pub fn route<T: StateType>(&self, id: StateId<T>) -> Option<&T> {
        self.route
            .get(id.index())
            .and_then(Option::as_ref)
            .and_then(T::from_value)
    }

    pub fn put_activity<T: StateType>(&mut self, id: StateId<T>, position: usize, value: T) {
        if id.index() >= self.activities.len() {
            self.activities.resize_with(id.index() + 1, Vec::new);
        }

        let values = &mut self.activities[id.index()];
        if position >= values.len() {
            values.resize(position + 1, None);
        }
        values[position] = Some(value.into_value());
    }

    pub fn activity<T: StateType>(&self, id: StateId<T>, position: usize) -> Option<&T> {
        self.activities
            .get(id.index())
            .and_then(|values| values.get(position))
            .and_then(Option::as_ref)
            .and_then(T::from_value)
    }
}
