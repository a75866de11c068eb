pub mod route;
pub mod route_id;
pub mod route_schedule;
pub mod solution;
pub mod solution_memory;
pub mod tour_activity;
pub mod working_solution;
