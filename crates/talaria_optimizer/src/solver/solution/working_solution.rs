use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::{
    problem::{
        job::JobIdx, vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        insertion::Insertion,
        solution::{route::WorkingSolutionRoute, route_id::RouteIdx},
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// Why a job could not be inserted into a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignedReason {
    pub route_id: RouteIdx,
    pub vehicle_id: VehicleIdx,
    pub code: &'static str,
}

/// Routes of every vehicle plus the jobs none of them serve.
///
/// With a finite fleet there is exactly one route per vehicle. With an infinite fleet there is
/// exactly one empty route per vehicle next to any number of used routes.
#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<WorkingSolutionRoute>,
    unassigned_jobs: FxHashSet<JobIdx>,
    unassigned_reasons: FxHashMap<JobIdx, Vec<UnassignedReason>>,
}

impl WorkingSolution {
    pub fn new(problem: Arc<VehicleRoutingProblem>) -> Self {
        let routes = problem
            .vehicles()
            .iter()
            .enumerate_idx()
            .map(|(vehicle_id, _)| WorkingSolutionRoute::empty(&problem, vehicle_id))
            .collect::<Vec<_>>();
        let unassigned_jobs = (0..problem.job_count()).map(JobIdx::new).collect();

        WorkingSolution {
            problem,
            routes,
            unassigned_jobs,
            unassigned_reasons: FxHashMap::default(),
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        self.problem.as_ref()
    }

    pub fn problem_arc(&self) -> Arc<VehicleRoutingProblem> {
        Arc::clone(&self.problem)
    }

    pub fn routes(&self) -> &[WorkingSolutionRoute] {
        &self.routes
    }

    pub(crate) fn routes_mut(&mut self) -> &mut [WorkingSolutionRoute] {
        &mut self.routes
    }

    pub fn route(&self, route_id: RouteIdx) -> &WorkingSolutionRoute {
        &self.routes[route_id]
    }

    pub(crate) fn route_mut(&mut self, route_id: RouteIdx) -> &mut WorkingSolutionRoute {
        &mut self.routes[route_id]
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &WorkingSolutionRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn non_empty_routes_count(&self) -> usize {
        self.non_empty_routes_iter().count()
    }

    pub fn unassigned_jobs(&self) -> &FxHashSet<JobIdx> {
        &self.unassigned_jobs
    }

    /// Unassigned jobs in index order.
    pub fn sorted_unassigned_jobs(&self) -> Vec<JobIdx> {
        let mut jobs = self.unassigned_jobs.iter().copied().collect::<Vec<_>>();
        jobs.sort_unstable();
        jobs
    }

    pub fn is_unassigned(&self, job_id: JobIdx) -> bool {
        self.unassigned_jobs.contains(&job_id)
    }

    pub fn has_unassigned(&self) -> bool {
        !self.unassigned_jobs.is_empty()
    }

    pub fn assigned_jobs_count(&self) -> usize {
        self.problem.job_count() - self.unassigned_jobs.len()
    }

    pub fn unassigned_reasons(&self, job_id: JobIdx) -> &[UnassignedReason] {
        self.unassigned_reasons
            .get(&job_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_unassigned_reasons(&mut self, job_id: JobIdx, reasons: Vec<UnassignedReason>) {
        if self.unassigned_jobs.contains(&job_id) {
            self.unassigned_reasons.insert(job_id, reasons);
        }
    }

    pub fn route_of_job(&self, job_id: JobIdx) -> Option<RouteIdx> {
        self.routes
            .iter()
            .enumerate_idx()
            .find(|(_, route)| route.contains_job(job_id))
            .map(|(route_id, _)| route_id)
    }

    /// Vehicles a non-empty route could switch to.
    pub fn unused_vehicles(&self) -> Vec<VehicleIdx> {
        if self.problem.fleet().is_infinite() {
            return self
                .problem
                .vehicles()
                .iter()
                .enumerate_idx()
                .map(|(vehicle_id, _)| vehicle_id)
                .collect();
        }

        self.routes
            .iter()
            .filter(|route| route.is_empty())
            .map(|route| route.vehicle_id())
            .collect()
    }

    pub fn insert(&mut self, insertion: &Insertion) {
        let route_id = insertion.route_id();
        if self.routes[route_id].vehicle_id() != insertion.vehicle_id() {
            self.switch_vehicle(route_id, insertion.vehicle_id());
        }

        let was_empty = self.routes[route_id].is_empty();
        let vehicle_id = self.routes[route_id].vehicle_id();

        self.routes[route_id].insert(&self.problem, insertion);
        self.unassigned_jobs.remove(&insertion.job_idx());
        self.unassigned_reasons.remove(&insertion.job_idx());

        if was_empty && self.problem.fleet().is_infinite() {
            self.routes
                .push(WorkingSolutionRoute::empty(&self.problem, vehicle_id));
        }
    }

    /// Moves a route to another vehicle. With a finite fleet the target vehicle's empty route
    /// takes over the vehicle the route had.
    pub fn switch_vehicle(&mut self, route_id: RouteIdx, vehicle_id: VehicleIdx) {
        let previous_vehicle_id = self.routes[route_id].vehicle_id();
        if previous_vehicle_id == vehicle_id {
            return;
        }

        if !self.problem.fleet().is_infinite()
            && let Some(other) = self
                .routes
                .iter()
                .position(|route| route.vehicle_id() == vehicle_id)
        {
            debug_assert!(self.routes[other].is_empty());
            self.routes[other].set_vehicle(&self.problem, previous_vehicle_id);
        }

        self.routes[route_id].set_vehicle(&self.problem, vehicle_id);
    }

    pub fn remove_job(&mut self, job_id: JobIdx) -> bool {
        let removed = self
            .routes
            .iter_mut()
            .any(|route| route.remove_job(job_id));

        if removed {
            self.unassigned_jobs.insert(job_id);
        }

        removed
    }

    /// Sends breaks of routes with nothing else to serve back to the unassigned jobs and, with
    /// an infinite fleet, compacts the routes back to one empty route per vehicle.
    /// Returns the pruned breaks.
    pub fn prune(&mut self) -> Vec<JobIdx> {
        let mut pruned = Vec::new();

        for route in &mut self.routes {
            if route.has_only_breaks(&self.problem) {
                let breaks = route.job_ids().collect::<Vec<_>>();
                for job_id in breaks {
                    route.remove_job(job_id);
                    pruned.push(job_id);
                }
            }
        }

        self.unassigned_jobs.extend(pruned.iter().copied());

        if self.problem.fleet().is_infinite() {
            self.routes.retain(|route| !route.is_empty());
            for vehicle_id in (0..self.problem.vehicles().len()).map(VehicleIdx::new) {
                self.routes
                    .push(WorkingSolutionRoute::empty(&self.problem, vehicle_id));
            }
        }

        pruned
    }

    /// To check if two working solutions are identical, we compare:
    /// 1) the number of routes
    /// 2) the vehicle IDs of each route
    /// 3) the activities of each route
    pub fn is_identical(&self, other: &WorkingSolution) -> bool {
        self.routes.len() == other.routes.len()
            && self
                .routes
                .iter()
                .zip(&other.routes)
                .all(|(route, other_route)| route.is_identical(other_route))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{
            break_job::BreakJob, fleet::FleetSize, service::ServiceBuilder,
            time_window::TimeWindows, vehicle::VehicleBuilder,
            vehicle_routing_problem::VehicleRoutingProblemBuilder,
        },
        solver::insertion::SingleInsertion,
        test_utils::{self, TestRoute},
    };

    use super::*;

    fn single(route_id: usize, job_id: usize, position: usize, vehicle_id: usize) -> Insertion {
        Insertion::Single(SingleInsertion {
            route_id: route_id.into(),
            job_index: job_id.into(),
            position,
            vehicle_id: vehicle_id.into(),
            cost: 0.0,
        })
    }

    #[test]
    fn test_insert_and_remove() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2, 3]),
            test_utils::create_basic_vehicles(vec![0, 0]),
        ));
        let mut solution = WorkingSolution::new(problem);
        assert_eq!(solution.routes().len(), 2);
        assert_eq!(solution.unassigned_jobs().len(), 3);

        solution.insert(&single(0, 1, 1, 0));
        assert!(!solution.is_unassigned(1.into()));
        assert_eq!(solution.route_of_job(1.into()), Some(RouteIdx::new(0)));
        assert_eq!(solution.unused_vehicles(), vec![VehicleIdx::new(1)]);

        assert!(solution.remove_job(1.into()));
        assert!(solution.is_unassigned(1.into()));
        assert!(!solution.remove_job(1.into()));
    }

    #[test]
    fn test_insert_with_vehicle_switch_finite() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            test_utils::create_basic_services(vec![1, 2]),
            test_utils::create_basic_vehicles(vec![0, 8]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );

        solution.insert(&single(0, 1, 2, 1));

        assert_eq!(solution.route(0.into()).vehicle_id(), VehicleIdx::new(1));
        assert_eq!(solution.route(1.into()).vehicle_id(), VehicleIdx::new(0));
        assert!(solution.route(1.into()).is_empty());
        assert_eq!(solution.route(0.into()).len(), 2);
    }

    #[test]
    fn test_infinite_fleet_keeps_one_empty_route_per_vehicle() {
        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(3, 3))
            .set_services(test_utils::create_basic_services(vec![1, 2]))
            .set_vehicles(test_utils::create_basic_vehicles(vec![0]))
            .set_fleet_size(FleetSize::Infinite);
        let problem = Arc::new(builder.build().unwrap());

        let mut solution = WorkingSolution::new(problem);
        assert_eq!(solution.routes().len(), 1);

        solution.insert(&single(0, 0, 1, 0));
        assert_eq!(solution.routes().len(), 2);
        assert!(solution.routes()[1].is_empty());

        solution.insert(&single(1, 1, 1, 0));
        assert_eq!(solution.routes().len(), 3);

        solution.remove_job(0.into());
        solution.prune();
        assert_eq!(solution.routes().len(), 2);
        assert_eq!(solution.non_empty_routes_count(), 1);
    }

    #[test]
    fn test_prune_routes_with_only_breaks() {
        let mut vehicle = VehicleBuilder::new("v1", 0);
        vehicle.set_break_id("lunch");

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_locations(test_utils::create_location_grid(3, 3))
            .add_service(ServiceBuilder::new("s1", 1).build())
            .add_break(BreakJob::new("lunch", 10.0, TimeWindows::single(0.0, 100.0)))
            .add_vehicle(vehicle.build());
        let problem = Arc::new(builder.build().unwrap());
        let break_id = problem.job_index("lunch").unwrap();

        let mut solution = WorkingSolution::new(problem);
        solution.insert(&single(0, 0, 1, 0));
        solution.insert(&single(0, break_id.get(), 2, 0));

        solution.remove_job(0.into());
        assert_eq!(solution.prune(), vec![break_id]);
        assert!(solution.routes()[0].is_empty());
        assert!(solution.is_unassigned(break_id));
    }
}
