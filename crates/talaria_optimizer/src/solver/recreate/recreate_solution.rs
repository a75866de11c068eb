use crate::solver::solution::working_solution::WorkingSolution;

use super::recreate_context::RecreateContext;

pub trait RecreateSolution {
    /// Inserts the unassigned jobs of a refreshed solution. Jobs that fit nowhere stay unassigned
    /// with the reasons of their last evaluation.
    fn recreate_solution(&self, solution: &mut WorkingSolution, context: &mut RecreateContext);
}
