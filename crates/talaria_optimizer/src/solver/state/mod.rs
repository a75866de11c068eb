pub mod latest_start_updater;
pub mod load_updater;
pub mod route_states;
pub mod schedule_updater;
pub mod state_id;
pub mod state_manager;
pub mod state_updater;
pub mod state_value;
