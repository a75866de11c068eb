use serde::Deserialize;

use crate::problem::location::{Location, LocationIdx};

pub type Distance = f64;
pub type Time = f64;
pub type Cost = f64;

/// Distances and travel times between every pair of locations.
///
/// Both are stored flat: the entry for `from -> to` lives at `from * num_locations + to`.
#[derive(Deserialize, Debug, Clone)]
pub struct TravelCostMatrix {
    distances: Vec<Distance>,
    times: Vec<Time>,
    num_locations: usize,
}

impl TravelCostMatrix {
    /// Returns `None` when the matrices are not square or their sizes differ.
    pub fn new(distances: Vec<Vec<Distance>>, times: Vec<Vec<Time>>) -> Option<Self> {
        let num_locations = distances.len();

        let is_square = |matrix: &[Vec<f64>]| {
            matrix.len() == num_locations && matrix.iter().all(|row| row.len() == num_locations)
        };

        if !is_square(&distances) || !is_square(&times) {
            return None;
        }

        Some(TravelCostMatrix {
            distances: distances.into_iter().flatten().collect(),
            times: times.into_iter().flatten().collect(),
            num_locations,
        })
    }

    /// Euclidean distances, travel time equal to distance.
    pub fn from_euclidean(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                distances[i * num_locations + j] = from.euclidean_distance(to);
            }
        }

        TravelCostMatrix {
            times: distances.clone(),
            distances,
            num_locations,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> Time {
        if from == to {
            return 0.0;
        }

        self.times[self.index(from, to)]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}
