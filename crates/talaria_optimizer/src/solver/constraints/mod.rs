pub mod activity_constraint;
pub mod break_constraint;
pub mod capacity_constraint;
pub mod hard_constraints;
pub mod load_constraint;
pub mod route_constraint;
pub mod skills_constraint;
pub mod time_window_constraint;
