use serde::{Deserialize, Serialize};

use crate::problem::vehicle::{Vehicle, VehicleIdx};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FleetSize {
    /// Each vehicle drives at most one route.
    #[default]
    Finite,
    /// Vehicles are types: any number of routes may use the same vehicle.
    Infinite,
}

#[derive(Debug)]
pub enum Fleet {
    Finite(Vec<Vehicle>),
    Infinite(Vec<Vehicle>),
}

impl Fleet {
    pub fn new(fleet_size: FleetSize, vehicles: Vec<Vehicle>) -> Self {
        match fleet_size {
            FleetSize::Finite => Fleet::Finite(vehicles),
            FleetSize::Infinite => Fleet::Infinite(vehicles),
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Fleet::Infinite(_))
    }

    pub fn size(&self) -> FleetSize {
        match self {
            Fleet::Finite(_) => FleetSize::Finite,
            Fleet::Infinite(_) => FleetSize::Infinite,
        }
    }

    #[inline]
    pub fn vehicles(&self) -> &[Vehicle] {
        match self {
            Fleet::Finite(vehicles) => vehicles,
            Fleet::Infinite(vehicles) => vehicles,
        }
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        &self.vehicles()[vehicle_id]
    }
}
