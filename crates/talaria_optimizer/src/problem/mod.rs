pub mod activity_costs;
pub mod amount;
pub mod break_job;
pub mod fleet;
pub mod job;
pub mod job_distance;
pub mod location;
pub mod problem_error;
pub mod service;
pub mod shipment;
pub mod skill;
pub mod time_window;
pub mod transport_costs;
pub mod travel_cost_matrix;
pub mod vehicle;
pub mod vehicle_routing_problem;
