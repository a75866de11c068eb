use std::{fmt::Debug, marker::PhantomData};

/// Typed key of a route or activity state registered in the
/// [`StateManager`](super::state_manager::StateManager).
pub struct StateId<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateId<T> {
    pub(crate) fn new(index: usize) -> Self {
        StateId {
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for StateId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateId<T> {}

impl<T> PartialEq for StateId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for StateId<T> {}

impl<T> Debug for StateId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StateId({})", self.index)
    }
}
