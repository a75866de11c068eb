use std::sync::Arc;

use rand::RngCore;

use crate::{
    problem::{
        amount::{Amount, Capacity},
        location::Location,
        service::{Service, ServiceBuilder},
        vehicle::{Vehicle, VehicleBuilder},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    solver::{
        insertion::{Insertion, SingleInsertion},
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

/// Location `i` sits at `(i % cols, i / cols)`.
pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    let mut locations = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let location = Location::from_cartesian(x as f64, y as f64);
            locations.push(location);
        }
    }

    locations
}

pub fn create_locations(locations: Vec<(f64, f64)>) -> Vec<Location> {
    locations
        .iter()
        .map(|&(x, y)| Location::from_cartesian(x, y))
        .collect()
}

pub fn basic_capacity() -> Capacity {
    Amount::from_vec(vec![10.0])
}

/// One service per location id, named after its index, with a demand of 1.
pub fn create_basic_services(location_ids: Vec<usize>) -> Vec<Service> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = ServiceBuilder::new(index.to_string(), location_id);
            builder.set_demand(Amount::from_vec(vec![1.0]));
            builder.build()
        })
        .collect()
}

/// One vehicle per depot location id, named after its index, with a capacity of 10.
pub fn create_basic_vehicles(location_ids: Vec<usize>) -> Vec<Vehicle> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = VehicleBuilder::new(index.to_string(), location_id);
            builder.set_capacity(basic_capacity());
            builder.build()
        })
        .collect()
}

/// Finite fleet with euclidean travel costs.
pub fn create_test_problem(
    locations: Vec<Location>,
    services: Vec<Service>,
    vehicles: Vec<Vehicle>,
) -> VehicleRoutingProblem {
    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_locations(locations)
        .set_services(services)
        .set_vehicles(vehicles);

    builder.build().unwrap()
}

pub struct TestRoute {
    pub vehicle_id: usize,
    pub service_ids: Vec<usize>,
}

/// The `i`-th test route becomes route `i`, moved to the requested vehicle.
pub fn create_test_working_solution(
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<TestRoute>,
) -> WorkingSolution {
    let mut solution = WorkingSolution::new(problem);

    for (route_id, route) in routes.iter().enumerate() {
        for (index, &service_id) in route.service_ids.iter().enumerate() {
            solution.insert(&Insertion::Single(SingleInsertion {
                route_id: RouteIdx::new(route_id),
                job_index: service_id.into(),
                position: index + 1,
                vehicle_id: route.vehicle_id.into(),
                cost: 0.0,
            }));
        }
    }

    solution
}

pub struct MockRng {
    data: Vec<u64>,
    index: usize,
}

impl MockRng {
    pub fn new(data: Vec<u64>) -> Self {
        MockRng { data, index: 0 }
    }
}

impl RngCore for MockRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.data[self.index % self.data.len()];
        self.index = (self.index + 1) % self.data.len();
        value
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst.iter_mut() {
            *byte = 0;
        }
    }
}
