use serde::Serialize;

use crate::{
    problem::{location::LocationIdx, travel_cost_matrix::Cost},
    solver::{
        accepted_solution::AcceptedSolution,
        cost::cost_analysis::ComponentCost,
        state::state_manager::StateManager,
    },
};

use super::working_solution::UnassignedReason;

/// Read-only snapshot of a solution, detached from the search.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub cost: Cost,
    pub cost_components: Vec<ComponentCost>,
    pub routes: Vec<SolutionRoute>,
    pub unassigned_jobs: Vec<UnassignedJob>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolutionRoute {
    pub vehicle_id: String,
    pub cost: Cost,
    pub distance: f64,
    pub duration: f64,
    pub waiting_duration: f64,
    pub activities: Vec<SolutionActivity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolutionActivity {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationIdx>,
    pub arrival_time: f64,
    pub end_time: f64,
    /// Load after the activity.
    pub load: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnassignedJob {
    pub job_id: String,
    pub reasons: Vec<UnassignedReason>,
}

impl Solution {
    /// Every route of the accepted solution must have been refreshed.
    pub fn from_accepted(states: &StateManager, accepted: &AcceptedSolution) -> Self {
        let solution = &accepted.solution;
        let problem = solution.problem();
        let core = states.core();
        let route_value =
            |route, id| states.route_state(route, id).copied().unwrap_or_default();

        let routes = solution
            .non_empty_routes_iter()
            .map(|route| SolutionRoute {
                vehicle_id: route.vehicle(problem).external_id().to_owned(),
                cost: states.route_cost(route),
                distance: route_value(route, core.distance),
                duration: route_value(route, core.duration),
                waiting_duration: route_value(route, core.waiting),
                activities: route
                    .activities()
                    .iter()
                    .enumerate()
                    .map(|(position, activity)| SolutionActivity {
                        kind: activity.kind().name(),
                        job_id: activity
                            .job_id()
                            .map(|job_id| problem.job(job_id).external_id().to_owned()),
                        location_id: activity.location_id(),
                        arrival_time: activity.arrival_time(),
                        end_time: activity.end_time(),
                        load: states
                            .activity_state(route, core.load, position)
                            .map(|load| load.to_vec())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();

        let unassigned_jobs = solution
            .sorted_unassigned_jobs()
            .into_iter()
            .map(|job_id| UnassignedJob {
                job_id: problem.job(job_id).external_id().to_owned(),
                reasons: solution.unassigned_reasons(job_id).to_vec(),
            })
            .collect();

        Solution {
            cost: accepted.cost,
            cost_components: accepted.cost_analysis.components.clone(),
            routes,
            unassigned_jobs,
        }
    }

    pub fn served_jobs_count(&self) -> usize {
        self.routes
            .iter()
            .flat_map(|route| &route.activities)
            .filter(|activity| matches!(activity.kind, "pickup_service" | "delivery_service" | "pickup_shipment"))
            .count()
    }
}
