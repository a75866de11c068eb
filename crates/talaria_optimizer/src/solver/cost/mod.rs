pub mod cost_analysis;
pub mod cost_component;
pub mod missed_break_cost;
pub mod route_cost_components;
pub mod solution_cost_calculator;
pub mod unassigned_penalty;
