use crate::{
    problem::{job::JobIdx, travel_cost_matrix::Cost},
    solver::{
        insertion::Insertion,
        insertion_evaluator::{FailureCodes, RouteEvaluation, compare_insertions},
        solution::{
            route_id::RouteIdx,
            working_solution::{UnassignedReason, WorkingSolution},
        },
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// Evaluation of one job against every route of a solution.
#[derive(Debug, Clone)]
pub struct JobInsertions {
    job_id: JobIdx,
    routes: Vec<RouteEvaluation>,
}

impl JobInsertions {
    pub fn new(job_id: JobIdx, routes: Vec<RouteEvaluation>) -> Self {
        JobInsertions { job_id, routes }
    }

    pub fn job_id(&self) -> JobIdx {
        self.job_id
    }

    pub fn set_route(&mut self, route_id: RouteIdx, evaluation: RouteEvaluation) {
        let index = route_id.get();
        if index >= self.routes.len() {
            self.routes.resize(index + 1, Err(FailureCodes::new()));
        }
        self.routes[index] = evaluation;
    }

    pub fn best(&self) -> Option<&Insertion> {
        self.feasible().min_by(|a, b| compare_insertions(a, b))
    }

    pub fn best_cost(&self) -> Cost {
        self.best().map_or(Cost::INFINITY, Insertion::cost)
    }

    pub fn feasible(&self) -> impl Iterator<Item = &Insertion> {
        self.routes
            .iter()
            .filter_map(|evaluation| evaluation.as_ref().ok())
    }

    /// Sum of the cost gaps between the best insertion and the next `k - 1` ones, infinite when
    /// the job fits in fewer than `k` routes.
    pub fn regret(&self, k: usize) -> Cost {
        let mut costs = self.feasible().map(Insertion::cost).collect::<Vec<_>>();
        costs.sort_by(|a, b| a.total_cmp(b));

        let Some(&best) = costs.first() else {
            return Cost::NEG_INFINITY;
        };

        (1..k.max(1))
            .map(|index| costs.get(index).map_or(Cost::INFINITY, |&cost| cost - best))
            .sum()
    }

    /// One reason per constraint that rejected the job on a route.
    pub fn reasons(&self, solution: &WorkingSolution) -> Vec<UnassignedReason> {
        self.routes
            .iter()
            .enumerate_idx()
            .filter_map(|(route_id, evaluation): (RouteIdx, _)| {
                evaluation.as_ref().err().map(|failures| (route_id, failures))
            })
            .flat_map(|(route_id, failures)| {
                let vehicle_id = solution.route(route_id).vehicle_id();
                failures.iter().map(move |&code| UnassignedReason {
                    route_id,
                    vehicle_id,
                    code,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use smallvec::smallvec;

    use crate::{solver::insertion::SingleInsertion, test_utils};

    use super::*;

    fn insertion(route_id: usize, cost: Cost) -> RouteEvaluation {
        Ok(Insertion::Single(SingleInsertion {
            route_id: route_id.into(),
            job_index: 0.into(),
            position: 1,
            vehicle_id: route_id.into(),
            cost,
        }))
    }

    #[test]
    fn test_best_and_regret() {
        let insertions = JobInsertions::new(
            0.into(),
            vec![
                insertion(0, 12.0),
                Err(smallvec!["capacity"]),
                insertion(2, 10.0),
                insertion(3, 15.0),
            ],
        );

        assert_eq!(insertions.best().map(Insertion::route_id), Some(2.into()));
        assert_eq!(insertions.regret(2), 2.0);
        assert_eq!(insertions.regret(3), 7.0);
        assert_eq!(insertions.regret(4), Cost::INFINITY);
    }

    #[test]
    fn test_ties_prefer_lowest_route() {
        let insertions =
            JobInsertions::new(0.into(), vec![insertion(0, 5.0), insertion(1, 5.0)]);

        assert_eq!(insertions.best().map(Insertion::route_id), Some(0.into()));
        assert_eq!(insertions.regret(2), 0.0);
    }

    #[test]
    fn test_infeasible_job() {
        let insertions = JobInsertions::new(0.into(), vec![Err(smallvec!["skills"])]);

        assert!(insertions.best().is_none());
        assert_eq!(insertions.best_cost(), Cost::INFINITY);
        assert_eq!(insertions.regret(2), Cost::NEG_INFINITY);
    }

    #[test]
    fn test_reasons_list_every_code_of_a_route() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            test_utils::create_basic_services(vec![1]),
            test_utils::create_basic_vehicles(vec![0, 0]),
        ));
        let solution = WorkingSolution::new(problem);
        let insertions = JobInsertions::new(
            0.into(),
            vec![
                Err(smallvec!["time_window", "capacity"]),
                Err(smallvec!["skills"]),
            ],
        );

        let reasons = insertions
            .reasons(&solution)
            .into_iter()
            .map(|reason| (reason.route_id.get(), reason.vehicle_id.get(), reason.code))
            .collect::<Vec<_>>();
        assert_eq!(
            reasons,
            vec![(0, 0, "time_window"), (0, 0, "capacity"), (1, 1, "skills")]
        );
    }
}
