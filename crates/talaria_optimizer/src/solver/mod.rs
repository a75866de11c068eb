pub mod accepted_solution;
pub mod constraints;
pub mod cost;
pub mod events;
pub mod insertion;
pub mod insertion_context;
pub mod insertion_evaluator;
pub mod recreate;
pub mod ruin;
pub mod search;
pub mod search_strategy;
pub mod solution;
pub mod solver;
pub mod solver_error;
pub mod solver_params;
pub mod state;
pub mod termination;
