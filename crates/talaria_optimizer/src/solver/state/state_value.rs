use crate::problem::{amount::Amount, location::LocationIdx};

#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Float(f64),
    Amount(Amount),
    Location(LocationIdx),
    Bool(bool),
}

/// Types that can be stored as a state value.
pub trait StateType: Sized {
    fn from_value(value: &StateValue) -> Option<&Self>;
    fn into_value(self) -> StateValue;
}

impl StateType for f64 {
    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Float(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Float(self)
    }
}

impl StateType for Amount {
    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Amount(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Amount(self)
    }
}

impl StateType for LocationIdx {
    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Location(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Location(self)
    }
}

impl StateType for bool {
    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Bool(self)
    }
}
