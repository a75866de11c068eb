use crate::problem::{
    job::JobIdx, location::LocationIdx, vehicle_routing_problem::VehicleRoutingProblem,
};

/// Dissimilarity between two jobs, used to build neighbour lists for radial ruin.
pub trait JobDistance: Send + Sync {
    fn distance(&self, problem: &VehicleRoutingProblem, a: JobIdx, b: JobIdx) -> f64;
}

/// Average euclidean distance over every pair of locations of the two jobs.
#[derive(Default)]
pub struct EuclideanJobDistance;

impl JobDistance for EuclideanJobDistance {
    fn distance(&self, problem: &VehicleRoutingProblem, a: JobIdx, b: JobIdx) -> f64 {
        average_over_locations(problem, a, b, |from, to| {
            problem
                .location(from)
                .euclidean_distance(problem.location(to))
        })
    }
}

/// Average travel time over every pair of locations of the two jobs, in both directions,
/// measured with the first vehicle of the fleet.
#[derive(Default)]
pub struct TransportTimeJobDistance;

impl JobDistance for TransportTimeJobDistance {
    fn distance(&self, problem: &VehicleRoutingProblem, a: JobIdx, b: JobIdx) -> f64 {
        let Some(vehicle) = problem.vehicles().first() else {
            return 0.0;
        };
        let transport_costs = problem.transport_costs();

        average_over_locations(problem, a, b, |from, to| {
            (transport_costs.transport_time(from, to, 0.0, vehicle)
                + transport_costs.transport_time(to, from, 0.0, vehicle))
                / 2.0
        })
    }
}

fn average_over_locations(
    problem: &VehicleRoutingProblem,
    a: JobIdx,
    b: JobIdx,
    distance: impl Fn(LocationIdx, LocationIdx) -> f64,
) -> f64 {
    let from_locations = problem.job(a).location_ids();
    let to_locations = problem.job(b).location_ids();

    let pairs = from_locations.len() * to_locations.len();
    if pairs == 0 {
        return 0.0;
    }

    let total: f64 = from_locations
        .iter()
        .flat_map(|&from| to_locations.iter().map(move |&to| (from, to)))
        .map(|(from, to)| distance(from, to))
        .sum();

    total / pairs as f64
}
