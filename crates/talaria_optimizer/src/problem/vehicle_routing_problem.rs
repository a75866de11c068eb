use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::{
    problem::{
        activity_costs::{ActivityCosts, WaitingActivityCosts},
        break_job::BreakJob,
        fleet::{Fleet, FleetSize},
        job::{Job, JobIdx},
        job_distance::{EuclideanJobDistance, JobDistance},
        location::{Location, LocationIdx},
        problem_error::ProblemError,
        service::Service,
        shipment::Shipment,
        transport_costs::{MatrixTransportCosts, TransportCosts},
        travel_cost_matrix::{Cost, TravelCostMatrix},
        vehicle::{Vehicle, VehicleCosts, VehicleIdx},
    },
    timer_debug,
    utils::enumerate_idx::EnumerateIdx,
};

/// Immutable description of the routing problem handed to the solver.
pub struct VehicleRoutingProblem {
    locations: Vec<Location>,
    fleet: Fleet,
    jobs: Vec<Job>,
    transport_costs: Arc<dyn TransportCosts>,
    activity_costs: Arc<dyn ActivityCosts>,

    has_time_windows: bool,
    capacity_dimensions: usize,
    max_cost: Cost,

    precomputed_job_neighbours: Vec<Vec<JobIdx>>,
    precomputed_average_cost_from_depot: Vec<Cost>,
    precomputed_vehicle_breaks: Vec<Option<JobIdx>>,
    precomputed_break_vehicles: FxHashMap<JobIdx, VehicleIdx>,
}

impl VehicleRoutingProblem {
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, job_id: JobIdx) -> &Job {
        &self.jobs[job_id]
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn job_index(&self, external_id: &str) -> Option<JobIdx> {
        self.jobs
            .iter()
            .position(|job| job.external_id() == external_id)
            .map(JobIdx::new)
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        self.fleet.vehicle(vehicle_id)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.fleet.vehicles()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn transport_costs(&self) -> &dyn TransportCosts {
        self.transport_costs.as_ref()
    }

    pub fn activity_costs(&self) -> &dyn ActivityCosts {
        self.activity_costs.as_ref()
    }

    pub fn has_time_windows(&self) -> bool {
        self.has_time_windows
    }

    pub fn capacity_dimensions(&self) -> usize {
        self.capacity_dimensions
    }

    /// Largest transport cost between two locations over every vehicle cost profile.
    pub fn max_cost(&self) -> Cost {
        self.max_cost
    }

    /// Other non-break jobs sorted by increasing distance to `job_id`.
    pub fn nearest_jobs(&self, job_id: JobIdx) -> &[JobIdx] {
        &self.precomputed_job_neighbours[job_id.get()]
    }

    /// Transport cost from the vehicle starts to the location, averaged over the fleet.
    pub fn average_cost_from_depot(&self, location_id: LocationIdx) -> Cost {
        self.precomputed_average_cost_from_depot[location_id.get()]
    }

    /// Average of [`Self::average_cost_from_depot`] over the job locations.
    pub fn job_cost_from_depot(&self, job_id: JobIdx) -> Cost {
        let location_ids = self.job(job_id).location_ids();
        if location_ids.is_empty() {
            return 0.0;
        }

        location_ids
            .iter()
            .map(|&location_id| self.average_cost_from_depot(location_id))
            .sum::<Cost>()
            / location_ids.len() as f64
    }

    pub fn vehicle_break(&self, vehicle_id: VehicleIdx) -> Option<JobIdx> {
        self.precomputed_vehicle_breaks[vehicle_id.get()]
    }

    pub fn break_vehicle(&self, job_id: JobIdx) -> Option<VehicleIdx> {
        self.precomputed_break_vehicles.get(&job_id).copied()
    }

    fn precompute_job_neighbours(&self, job_distance: &dyn JobDistance) -> Vec<Vec<JobIdx>> {
        let candidates: Vec<JobIdx> = self
            .jobs
            .iter()
            .enumerate_idx()
            .filter(|(_, job)| !job.is_break())
            .map(|(job_id, _)| job_id)
            .collect();

        self.jobs
            .iter()
            .enumerate_idx()
            .map(|(job_id, job)| {
                if job.is_break() {
                    return Vec::new();
                }

                let mut neighbours: Vec<(f64, JobIdx)> = candidates
                    .iter()
                    .filter(|&&other| other != job_id)
                    .map(|&other| (job_distance.distance(self, job_id, other), other))
                    .collect();

                neighbours.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                neighbours.into_iter().map(|(_, other)| other).collect()
            })
            .collect()
    }

    fn precompute_average_cost_from_depot(&self) -> Vec<Cost> {
        let vehicles = self.vehicles();
        (0..self.locations.len())
            .map(|location| {
                vehicles
                    .iter()
                    .map(|vehicle| {
                        self.transport_costs.transport_cost(
                            vehicle.start_location_id(),
                            location.into(),
                            vehicle.earliest_start(),
                            vehicle,
                        )
                    })
                    .sum::<Cost>()
                    / vehicles.len() as f64
            })
            .collect()
    }

    fn precompute_max_cost(&self) -> Cost {
        let mut profiles: Vec<&VehicleCosts> = Vec::new();
        let mut representatives: Vec<&Vehicle> = Vec::new();

        for vehicle in self.vehicles() {
            if !profiles.contains(&vehicle.costs()) {
                profiles.push(vehicle.costs());
                representatives.push(vehicle);
            }
        }

        let num_locations = self.locations.len();
        let mut max_cost: Cost = 0.0;
        for vehicle in representatives {
            for from in 0..num_locations {
                for to in 0..num_locations {
                    let cost = self.transport_costs.transport_cost(
                        from.into(),
                        to.into(),
                        0.0,
                        vehicle,
                    );
                    max_cost = max_cost.max(cost);
                }
            }
        }

        max_cost
    }
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    locations: Vec<Location>,
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    fleet_size: FleetSize,
    travel_cost_matrix: Option<TravelCostMatrix>,
    transport_costs: Option<Arc<dyn TransportCosts>>,
    activity_costs: Option<Arc<dyn ActivityCosts>>,
    job_distance: Option<Box<dyn JobDistance>>,
}

impl VehicleRoutingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut VehicleRoutingProblemBuilder {
        self.locations = locations;
        self
    }

    pub fn add_location(&mut self, location: Location) -> &mut VehicleRoutingProblemBuilder {
        self.locations.push(location);
        self
    }

    pub fn set_services(&mut self, services: Vec<Service>) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.retain(|job| !matches!(job, Job::Service(_)));
        self.jobs.extend(services.into_iter().map(Job::Service));
        self
    }

    pub fn add_service(&mut self, service: Service) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.push(Job::Service(service));
        self
    }

    pub fn add_shipment(&mut self, shipment: Shipment) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.push(Job::Shipment(shipment));
        self
    }

    pub fn add_break(&mut self, break_job: BreakJob) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.push(Job::Break(break_job));
        self
    }

    pub fn add_job(&mut self, job: Job) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.push(job);
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles = vehicles;
        self
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles.push(vehicle);
        self
    }

    pub fn set_fleet_size(&mut self, fleet_size: FleetSize) -> &mut VehicleRoutingProblemBuilder {
        self.fleet_size = fleet_size;
        self
    }

    /// Matrix used by the default [`MatrixTransportCosts`]. Euclidean distances are used when
    /// neither a matrix nor custom transport costs are given.
    pub fn set_travel_cost_matrix(
        &mut self,
        matrix: TravelCostMatrix,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.travel_cost_matrix = Some(matrix);
        self
    }

    pub fn set_transport_costs(
        &mut self,
        transport_costs: Arc<dyn TransportCosts>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.transport_costs = Some(transport_costs);
        self
    }

    pub fn set_activity_costs(
        &mut self,
        activity_costs: Arc<dyn ActivityCosts>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.activity_costs = Some(activity_costs);
        self
    }

    pub fn set_job_distance(
        &mut self,
        job_distance: Box<dyn JobDistance>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.job_distance = Some(job_distance);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, ProblemError> {
        if self.vehicles.is_empty() {
            return Err(ProblemError::NoVehicles);
        }

        self.validate_locations()?;
        self.validate_jobs()?;
        let (vehicle_breaks, break_vehicles) = self.resolve_breaks()?;

        let capacity_dimensions = self
            .jobs
            .iter()
            .map(|job| job.demand().len())
            .max()
            .unwrap_or(0);

        if capacity_dimensions > 0 {
            for vehicle in &self.vehicles {
                if vehicle.capacity().len() < capacity_dimensions {
                    return Err(ProblemError::CapacityDimensions {
                        vehicle: vehicle.external_id().to_owned(),
                        expected: capacity_dimensions,
                        actual: vehicle.capacity().len(),
                    });
                }
            }
        }

        let transport_costs = match (self.transport_costs, self.travel_cost_matrix) {
            (Some(transport_costs), _) => transport_costs,
            (None, Some(matrix)) => {
                if matrix.num_locations() != self.locations.len() {
                    return Err(ProblemError::MatrixSize {
                        expected: self.locations.len(),
                        actual: matrix.num_locations(),
                    });
                }
                Arc::new(MatrixTransportCosts::new(matrix))
            }
            (None, None) => Arc::new(MatrixTransportCosts::new(
                TravelCostMatrix::from_euclidean(&self.locations),
            )),
        };

        let activity_costs = self
            .activity_costs
            .unwrap_or_else(|| Arc::new(WaitingActivityCosts));

        let job_distance = self
            .job_distance
            .unwrap_or_else(|| Box::new(EuclideanJobDistance));

        let mut problem = VehicleRoutingProblem {
            has_time_windows: self.jobs.iter().any(|job| job.has_time_windows()),
            capacity_dimensions,
            max_cost: 0.0,
            locations: self.locations,
            fleet: Fleet::new(self.fleet_size, self.vehicles),
            jobs: self.jobs,
            transport_costs,
            activity_costs,
            precomputed_job_neighbours: Vec::new(),
            precomputed_average_cost_from_depot: Vec::new(),
            precomputed_vehicle_breaks: vehicle_breaks,
            precomputed_break_vehicles: break_vehicles,
        };

        problem.max_cost = problem.precompute_max_cost();
        problem.precomputed_average_cost_from_depot =
            problem.precompute_average_cost_from_depot();
        problem.precomputed_job_neighbours = timer_debug!(
            "Precompute job neighbours",
            problem.precompute_job_neighbours(job_distance.as_ref())
        );

        debug!(
            jobs = problem.jobs.len(),
            vehicles = problem.vehicles().len(),
            max_cost = problem.max_cost,
            "Built vehicle routing problem"
        );

        Ok(problem)
    }

    fn validate_locations(&self) -> Result<(), ProblemError> {
        let count = self.locations.len();
        let check = |owner: &str, location: LocationIdx| {
            if location.get() >= count {
                Err(ProblemError::LocationOutOfRange {
                    owner: owner.to_owned(),
                    location: location.get(),
                    count,
                })
            } else {
                Ok(())
            }
        };

        for vehicle in &self.vehicles {
            check(vehicle.external_id(), vehicle.start_location_id())?;
            if let Some(end) = vehicle.end_location_id() {
                check(vehicle.external_id(), end)?;
            }
        }

        for job in &self.jobs {
            for location in job.location_ids() {
                check(job.external_id(), location)?;
            }
        }

        Ok(())
    }

    fn validate_jobs(&self) -> Result<(), ProblemError> {
        let mut seen = FxHashSet::default();

        for job in &self.jobs {
            if !seen.insert(job.external_id()) {
                return Err(ProblemError::DuplicateJobId(job.external_id().to_owned()));
            }

            if !(1..=4).contains(&job.priority()) {
                return Err(ProblemError::InvalidPriority {
                    job: job.external_id().to_owned(),
                    priority: job.priority(),
                });
            }
        }

        Ok(())
    }

    #[allow(clippy::type_complexity)]
    fn resolve_breaks(
        &self,
    ) -> Result<(Vec<Option<JobIdx>>, FxHashMap<JobIdx, VehicleIdx>), ProblemError> {
        let mut vehicle_breaks = Vec::with_capacity(self.vehicles.len());
        let mut break_vehicles: FxHashMap<JobIdx, VehicleIdx> = FxHashMap::default();

        for (vehicle_id, vehicle) in self.vehicles.iter().enumerate_idx::<VehicleIdx>() {
            let Some(break_id) = vehicle.break_id() else {
                vehicle_breaks.push(None);
                continue;
            };

            let job_id = self
                .jobs
                .iter()
                .position(|job| job.is_break() && job.external_id() == break_id)
                .map(JobIdx::new)
                .ok_or_else(|| ProblemError::UnknownBreak {
                    vehicle: vehicle.external_id().to_owned(),
                    break_id: break_id.to_owned(),
                })?;

            if let Some(&other) = break_vehicles.get(&job_id) {
                return Err(ProblemError::SharedBreak {
                    break_id: break_id.to_owned(),
                    first: self.vehicles[other].external_id().to_owned(),
                    second: vehicle.external_id().to_owned(),
                });
            }

            break_vehicles.insert(job_id, vehicle_id);
            vehicle_breaks.push(Some(job_id));
        }

        for (job_id, job) in self.jobs.iter().enumerate_idx::<JobIdx>() {
            if job.is_break() && !break_vehicles.contains_key(&job_id) {
                return Err(ProblemError::UnboundBreak(job.external_id().to_owned()));
            }
        }

        Ok((vehicle_breaks, break_vehicles))
    }
}
