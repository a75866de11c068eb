pub mod best_insertion;
pub mod job_insertions;
pub mod recreate_context;
pub mod recreate_params;
pub mod recreate_solution;
pub mod recreate_strategy;
pub mod regret_insertion;
pub mod vehicle_switch;
