pub mod termination;
pub mod termination_state;
