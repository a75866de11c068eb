pub mod vehicle_routing_problem_input;
