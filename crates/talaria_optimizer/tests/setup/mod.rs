use talaria_optimizer::{
    problem::{
        amount::Amount,
        fleet::FleetSize,
        location::Location,
        service::{Service, ServiceBuilder},
        shipment::{Shipment, ShipmentBuilder, ShipmentTask},
        vehicle::{Vehicle, VehicleBuilder},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    solver::{
        solution::solution::Solution,
        solver_params::{SolverParams, Threads},
        termination::termination::Termination,
    },
};

pub fn create_locations(locations: &[(f64, f64)]) -> Vec<Location> {
    locations
        .iter()
        .map(|&(x, y)| Location::from_cartesian(x, y))
        .collect()
}

/// Location `i` sits at `(i % cols, i / cols)`.
pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    (0..rows * cols)
        .map(|index| Location::from_cartesian((index % cols) as f64, (index / cols) as f64))
        .collect()
}

/// Services named `s{index}`.
pub fn create_services(location_ids: &[usize], demand: f64) -> Vec<Service> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = ServiceBuilder::new(format!("s{index}"), location_id);
            builder.set_demand(Amount::from_vec(vec![demand]));
            builder.build()
        })
        .collect()
}

/// Shipments named `sh{index}`, from the first location of each pair to the second.
pub fn create_shipments(pairs: &[(usize, usize)], demand: f64) -> Vec<Shipment> {
    pairs
        .iter()
        .enumerate()
        .map(|(index, &(pickup, delivery))| {
            let mut builder = ShipmentBuilder::new(
                format!("sh{index}"),
                ShipmentTask::new(pickup),
                ShipmentTask::new(delivery),
            );
            builder.set_demand(Amount::from_vec(vec![demand]));
            builder.build()
        })
        .collect()
}

/// Vehicles named `v{index}`.
pub fn create_vehicles(depots: &[usize], capacity: f64) -> Vec<Vehicle> {
    depots
        .iter()
        .enumerate()
        .map(|(index, &depot)| {
            let mut builder = VehicleBuilder::new(format!("v{index}"), depot);
            builder.set_capacity(Amount::from_vec(vec![capacity]));
            builder.build()
        })
        .collect()
}

/// Finite fleet with euclidean travel costs.
pub fn create_test_problem(
    locations: Vec<Location>,
    services: Vec<Service>,
    shipments: Vec<Shipment>,
    vehicles: Vec<Vehicle>,
) -> VehicleRoutingProblem {
    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_locations(locations)
        .set_services(services)
        .set_vehicles(vehicles)
        .set_fleet_size(FleetSize::Finite);
    for shipment in shipments {
        builder.add_shipment(shipment);
    }

    builder.build().unwrap()
}

/// Single threaded run of `iterations` iterations.
pub fn create_params(seed: u64, iterations: usize) -> SolverParams {
    SolverParams {
        terminations: vec![Termination::Iterations(iterations)],
        insertion_threads: Threads::Single,
        seed,
        ..SolverParams::default()
    }
}

/// Every job appears exactly once, either in a route or in the unassigned jobs.
pub fn assert_covers_every_job(problem: &VehicleRoutingProblem, solution: &Solution) {
    let mut job_ids = solution
        .routes
        .iter()
        .flat_map(|route| route.activities.iter())
        .filter_map(|activity| activity.job_id.clone())
        .chain(solution.unassigned_jobs.iter().map(|job| job.job_id.clone()))
        .collect::<Vec<_>>();
    job_ids.sort();

    let mut expected = problem
        .jobs()
        .iter()
        .flat_map(|job| {
            let copies = if job.is_shipment() { 2 } else { 1 };
            std::iter::repeat_n(job.external_id().to_owned(), copies)
        })
        .collect::<Vec<_>>();
    expected.sort();

    assert_eq!(job_ids, expected);
}

/// The load carried after each activity fits the vehicle capacity.
pub fn assert_capacity_holds(problem: &VehicleRoutingProblem, solution: &Solution) {
    for route in &solution.routes {
        let vehicle = problem
            .vehicles()
            .iter()
            .find(|vehicle| vehicle.external_id() == route.vehicle_id)
            .unwrap();

        for activity in &route.activities {
            for (dimension, load) in activity.load.iter().enumerate() {
                assert!(
                    *load <= vehicle.capacity().get(dimension) + 1e-9,
                    "{} carries {load} on dimension {dimension}",
                    route.vehicle_id
                );
            }
        }
    }
}
