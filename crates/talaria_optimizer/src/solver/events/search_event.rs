use serde::Serialize;

use crate::{
    problem::{job::JobIdx, travel_cost_matrix::Cost, vehicle::VehicleIdx},
    solver::solution::{route_id::RouteIdx, working_solution::UnassignedReason},
};

/// Everything observable from the outside while the search runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    SearchStarted {
        max_iterations: Option<usize>,
    },
    IterationStarted {
        iteration: usize,
    },
    StrategySelected {
        iteration: usize,
        strategy: String,
    },
    RuinStarted {
        strategy: &'static str,
        count: usize,
    },
    JobRemoved {
        job_id: JobIdx,
        route_id: RouteIdx,
    },
    RuinEnded {
        removed: usize,
    },
    JobInserted {
        job_id: JobIdx,
        route_id: RouteIdx,
        vehicle_id: VehicleIdx,
        cost: Cost,
    },
    VehicleSwitched {
        route_id: RouteIdx,
        from: VehicleIdx,
        to: VehicleIdx,
    },
    JobUnassigned {
        job_id: JobIdx,
        reasons: Vec<UnassignedReason>,
    },
    AcceptanceDecision {
        iteration: usize,
        cost: Cost,
        accepted: bool,
    },
    NewBestSolution {
        iteration: usize,
        cost: Cost,
    },
    IterationCompleted {
        iteration: usize,
        cost: Cost,
    },
    SearchEnded {
        iterations: usize,
        best_cost: Option<Cost>,
    },
}

impl SearchEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SearchEvent::SearchStarted { .. } => "search_started",
            SearchEvent::IterationStarted { .. } => "iteration_started",
            SearchEvent::StrategySelected { .. } => "strategy_selected",
            SearchEvent::RuinStarted { .. } => "ruin_started",
            SearchEvent::JobRemoved { .. } => "job_removed",
            SearchEvent::RuinEnded { .. } => "ruin_ended",
            SearchEvent::JobInserted { .. } => "job_inserted",
            SearchEvent::VehicleSwitched { .. } => "vehicle_switched",
            SearchEvent::JobUnassigned { .. } => "job_unassigned",
            SearchEvent::AcceptanceDecision { .. } => "acceptance_decision",
            SearchEvent::NewBestSolution { .. } => "new_best_solution",
            SearchEvent::IterationCompleted { .. } => "iteration_completed",
            SearchEvent::SearchEnded { .. } => "search_ended",
        }
    }
}
