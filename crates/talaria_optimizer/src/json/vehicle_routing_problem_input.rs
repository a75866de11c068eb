use std::sync::Arc;

use serde::Deserialize;

use crate::problem::{
    activity_costs::SoftTimeWindowActivityCosts,
    amount::Capacity,
    break_job::BreakJob,
    fleet::FleetSize,
    location::Location,
    problem_error::ProblemError,
    service::{ServiceBuilder, ServiceType},
    shipment::{ShipmentBuilder, ShipmentTask},
    time_window::{TimeWindow, TimeWindows},
    travel_cost_matrix::TravelCostMatrix,
    vehicle::{VehicleBuilder, VehicleCosts},
    vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleRoutingProblemInput {
    pub locations: Vec<LocationInput>,
    #[serde(default)]
    pub services: Vec<ServiceInput>,
    #[serde(default)]
    pub shipments: Vec<ShipmentInput>,
    #[serde(default)]
    pub breaks: Vec<BreakInput>,
    pub vehicles: Vec<VehicleInput>,
    #[serde(default)]
    pub fleet_size: FleetSize,
    /// Euclidean distances between the coordinates when missing.
    pub matrix: Option<MatrixInput>,
    /// Charge lateness instead of forbidding it.
    #[serde(default)]
    pub soft_time_windows: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationInput {
    pub id: Option<String>,
    pub coordinates: [f64; 2],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixInput {
    pub distances: Vec<Vec<f64>>,
    /// Travel times equal the distances when missing.
    pub times: Option<Vec<Vec<f64>>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceInput {
    pub id: String,
    pub location_id: usize,
    pub duration: Option<f64>,
    pub setup_duration: Option<f64>,
    pub demand: Option<Capacity>,
    pub skills: Option<Vec<String>>,
    pub time_windows: Option<Vec<TimeWindow>>,
    #[serde(rename = "type")]
    pub service_type: Option<ServiceType>,
    pub priority: Option<u8>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipmentTaskInput {
    pub location_id: usize,
    pub duration: Option<f64>,
    pub setup_duration: Option<f64>,
    pub time_windows: Option<Vec<TimeWindow>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipmentInput {
    pub id: String,
    pub pickup: ShipmentTaskInput,
    pub delivery: ShipmentTaskInput,
    pub demand: Option<Capacity>,
    pub skills: Option<Vec<String>>,
    pub priority: Option<u8>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreakInput {
    pub id: String,
    pub duration: f64,
    #[serde(default)]
    pub time_windows: Vec<TimeWindow>,
    pub location_id: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleInput {
    pub id: String,
    pub start_location_id: usize,
    pub end_location_id: Option<usize>,
    /// Ignored when `end_location_id` is set.
    pub return_to_depot: Option<bool>,
    pub earliest_start: Option<f64>,
    pub latest_end: Option<f64>,
    pub capacity: Option<Capacity>,
    pub costs: Option<VehicleCosts>,
    pub skills: Option<Vec<String>>,
    pub break_id: Option<String>,
}

impl From<ShipmentTaskInput> for ShipmentTask {
    fn from(input: ShipmentTaskInput) -> Self {
        let mut task = ShipmentTask::new(input.location_id);
        if let Some(duration) = input.duration {
            task = task.with_duration(duration);
        }
        if let Some(setup_duration) = input.setup_duration {
            task = task.with_setup_duration(setup_duration);
        }
        if let Some(time_windows) = input.time_windows {
            task = task.with_time_windows(TimeWindows::new(time_windows));
        }
        task
    }
}

impl VehicleRoutingProblemInput {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn into_problem(self) -> Result<VehicleRoutingProblem, ProblemError> {
        let mut builder = VehicleRoutingProblemBuilder::default();

        let expected_locations = self.locations.len();
        builder.set_locations(
            self.locations
                .into_iter()
                .map(|location| {
                    let [x, y] = location.coordinates;
                    match location.id {
                        Some(id) => Location::from_cartesian(x, y).with_external_id(id),
                        None => Location::from_cartesian(x, y),
                    }
                })
                .collect(),
        );

        for input in self.services {
            let mut service = ServiceBuilder::new(input.id, input.location_id);
            if let Some(duration) = input.duration {
                service.set_duration(duration);
            }
            if let Some(setup_duration) = input.setup_duration {
                service.set_setup_duration(setup_duration);
            }
            if let Some(demand) = input.demand {
                service.set_demand(demand);
            }
            if let Some(skills) = input.skills {
                service.set_skills(skills);
            }
            if let Some(time_windows) = input.time_windows {
                service.set_time_windows(TimeWindows::new(time_windows));
            }
            if let Some(service_type) = input.service_type {
                service.set_service_type(service_type);
            }
            if let Some(priority) = input.priority {
                service.set_priority(priority);
            }
            builder.add_service(service.build());
        }

        for input in self.shipments {
            let mut shipment =
                ShipmentBuilder::new(input.id, input.pickup.into(), input.delivery.into());
            if let Some(demand) = input.demand {
                shipment.set_demand(demand);
            }
            if let Some(skills) = input.skills {
                shipment.set_skills(skills);
            }
            if let Some(priority) = input.priority {
                shipment.set_priority(priority);
            }
            builder.add_shipment(shipment.build());
        }

        for input in self.breaks {
            let mut break_job =
                BreakJob::new(input.id, input.duration, TimeWindows::new(input.time_windows));
            if let Some(location_id) = input.location_id {
                break_job = break_job.with_location(location_id);
            }
            builder.add_break(break_job);
        }

        for input in self.vehicles {
            let mut vehicle = VehicleBuilder::new(input.id, input.start_location_id);
            if let Some(end_location_id) = input.end_location_id {
                vehicle.set_end_location_id(end_location_id);
            }
            if let Some(return_to_depot) = input.return_to_depot {
                vehicle.set_return(return_to_depot);
            }
            if let Some(earliest_start) = input.earliest_start {
                vehicle.set_earliest_start(earliest_start);
            }
            if let Some(latest_end) = input.latest_end {
                vehicle.set_latest_end(latest_end);
            }
            if let Some(capacity) = input.capacity {
                vehicle.set_capacity(capacity);
            }
            if let Some(costs) = input.costs {
                vehicle.set_costs(costs);
            }
            if let Some(skills) = input.skills {
                vehicle.set_skills(skills);
            }
            if let Some(break_id) = input.break_id {
                vehicle.set_break_id(break_id);
            }
            builder.add_vehicle(vehicle.build());
        }

        builder.set_fleet_size(self.fleet_size);

        if let Some(matrix) = self.matrix {
            let actual = matrix.distances.len();
            let times = matrix.times.unwrap_or_else(|| matrix.distances.clone());
            let matrix = TravelCostMatrix::new(matrix.distances, times).ok_or(
                ProblemError::MatrixSize {
                    expected: expected_locations,
                    actual,
                },
            )?;
            builder.set_travel_cost_matrix(matrix);
        }

        if self.soft_time_windows {
            builder.set_activity_costs(Arc::new(SoftTimeWindowActivityCosts));
        }

        builder.build()
    }
}
