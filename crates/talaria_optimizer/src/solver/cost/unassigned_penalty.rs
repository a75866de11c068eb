use serde::Deserialize;

use crate::{
    problem::{job::Job, travel_cost_matrix::Cost, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        cost::cost_component::CostComponent, solution::working_solution::WorkingSolution,
        state::state_manager::StateManager,
    },
};

pub const UNASSIGNED_PENALTY: &str = "unassigned";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct UnassignedPenaltyParams {
    pub factor: f64,
    /// Penalty of a job is proportional to `priority_offset - priority`, so it must be larger
    /// than the largest priority.
    pub priority_offset: f64,
    pub missed_break_factor: f64,
}

impl Default for UnassignedPenaltyParams {
    fn default() -> Self {
        UnassignedPenaltyParams {
            factor: 2.0,
            priority_offset: 5.0,
            missed_break_factor: 1.0,
        }
    }
}

/// Penalty for every unassigned job, decreasing with the priority number. Breaks are charged by
/// the missed break component instead.
pub struct UnassignedPenaltyComponent {
    params: UnassignedPenaltyParams,
}

impl UnassignedPenaltyComponent {
    pub fn new(params: UnassignedPenaltyParams) -> Self {
        UnassignedPenaltyComponent { params }
    }

    pub fn job_penalty(&self, problem: &VehicleRoutingProblem, job: &Job) -> Cost {
        if job.is_break() {
            return 0.0;
        }

        problem.max_cost()
            * self.params.factor
            * (self.params.priority_offset - f64::from(job.priority()))
    }
}

impl CostComponent for UnassignedPenaltyComponent {
    fn id(&self) -> &str {
        UNASSIGNED_PENALTY
    }

    fn solution_cost(&self, _states: &StateManager, solution: &WorkingSolution) -> Cost {
        let problem = solution.problem();
        solution
            .unassigned_jobs()
            .iter()
            .map(|&job_id| self.job_penalty(problem, problem.job(job_id)))
            .sum()
    }
}
