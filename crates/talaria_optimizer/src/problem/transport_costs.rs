use crate::problem::{
    location::LocationIdx,
    travel_cost_matrix::{Cost, Distance, Time, TravelCostMatrix},
    vehicle::Vehicle,
};

/// Cost and duration of driving between two locations.
///
/// Implementations must be deterministic and defined for every pair of locations of the problem.
pub trait TransportCosts: Send + Sync {
    fn transport_cost(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: f64,
        vehicle: &Vehicle,
    ) -> Cost;

    fn transport_time(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: f64,
        vehicle: &Vehicle,
    ) -> Time;

    /// Cost of driving `from -> to` so as to arrive at `arrival_time`.
    fn backward_transport_cost(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        arrival_time: f64,
        vehicle: &Vehicle,
    ) -> Cost {
        self.transport_cost(from, to, arrival_time, vehicle)
    }

    /// Duration of driving `from -> to` so as to arrive at `arrival_time`.
    fn backward_transport_time(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        arrival_time: f64,
        vehicle: &Vehicle,
    ) -> Time {
        self.transport_time(from, to, arrival_time, vehicle)
    }

    fn distance(&self, from: LocationIdx, to: LocationIdx, departure_time: f64) -> Distance;
}

/// Time independent costs read from a [`TravelCostMatrix`]:
/// `per_distance * distance + per_time * time`.
pub struct MatrixTransportCosts {
    matrix: TravelCostMatrix,
}

impl MatrixTransportCosts {
    pub fn new(matrix: TravelCostMatrix) -> Self {
        MatrixTransportCosts { matrix }
    }

    pub fn matrix(&self) -> &TravelCostMatrix {
        &self.matrix
    }
}

impl TransportCosts for MatrixTransportCosts {
    #[inline]
    fn transport_cost(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        _departure_time: f64,
        vehicle: &Vehicle,
    ) -> Cost {
        let costs = vehicle.costs();
        costs.per_distance * self.matrix.travel_distance(from, to)
            + costs.per_time * self.matrix.travel_time(from, to)
    }

    #[inline]
    fn transport_time(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        _departure_time: f64,
        _vehicle: &Vehicle,
    ) -> Time {
        self.matrix.travel_time(from, to)
    }

    #[inline]
    fn distance(&self, from: LocationIdx, to: LocationIdx, _departure_time: f64) -> Distance {
        self.matrix.travel_distance(from, to)
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::vehicle::{VehicleBuilder, VehicleCosts};

    use super::*;

    #[test]
    fn test_matrix_transport_costs() {
        let matrix = TravelCostMatrix::new(
            vec![vec![0.0, 10.0], vec![10.0, 0.0]],
            vec![vec![0.0, 4.0], vec![4.0, 0.0]],
        )
        .unwrap();
        let costs = MatrixTransportCosts::new(matrix);

        let mut builder = VehicleBuilder::new("v1", 0);
        builder.set_costs(VehicleCosts {
            per_distance: 2.0,
            per_time: 0.5,
            ..VehicleCosts::default()
        });
        let vehicle = builder.build();

        assert_eq!(costs.transport_cost(0.into(), 1.into(), 0.0, &vehicle), 22.0);
        assert_eq!(costs.transport_time(0.into(), 1.into(), 0.0, &vehicle), 4.0);
        assert_eq!(
            costs.backward_transport_cost(0.into(), 1.into(), 100.0, &vehicle),
            22.0
        );
        assert_eq!(costs.distance(1.into(), 0.into(), 0.0), 10.0);
    }
}
