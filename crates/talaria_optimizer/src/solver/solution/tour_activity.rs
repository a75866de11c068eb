use std::fmt::Display;

use serde::Serialize;
use smallvec::SmallVec;

use crate::problem::{
    amount::Amount,
    job::{Job, JobIdx},
    location::LocationIdx,
    service::ServiceType,
    time_window::TimeWindows,
    vehicle::Vehicle,
    vehicle_routing_problem::VehicleRoutingProblem,
};

#[derive(Hash, Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "job", rename_all = "snake_case")]
pub enum ActivityKind {
    Start,
    End,
    PickupService(JobIdx),
    DeliveryService(JobIdx),
    PickupShipment(JobIdx),
    DeliverShipment(JobIdx),
    Break(JobIdx),
}

impl ActivityKind {
    pub fn job_id(&self) -> Option<JobIdx> {
        match *self {
            ActivityKind::Start | ActivityKind::End => None,
            ActivityKind::PickupService(job_id)
            | ActivityKind::DeliveryService(job_id)
            | ActivityKind::PickupShipment(job_id)
            | ActivityKind::DeliverShipment(job_id)
            | ActivityKind::Break(job_id) => Some(job_id),
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, ActivityKind::Start)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, ActivityKind::End)
    }

    pub fn is_break(&self) -> bool {
        matches!(self, ActivityKind::Break(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivityKind::Start => "start",
            ActivityKind::End => "end",
            ActivityKind::PickupService(_) => "pickup_service",
            ActivityKind::DeliveryService(_) => "delivery_service",
            ActivityKind::PickupShipment(_) => "pickup_shipment",
            ActivityKind::DeliverShipment(_) => "deliver_shipment",
            ActivityKind::Break(_) => "break",
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.job_id() {
            Some(job_id) => write!(f, "{}({})", self.name(), job_id),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// A stop of a route.
///
/// `arrival_time` and `end_time` are schedule values written by the schedule state updater and
/// are only meaningful once the owning route has been refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct TourActivity {
    kind: ActivityKind,
    /// `None` means the activity happens where the vehicle already is.
    location_id: Option<LocationIdx>,
    setup_duration: f64,
    operation_time: f64,
    time_windows: TimeWindows,
    /// Signed change of the vehicle load when the activity is served.
    load_change: Amount,
    pub(crate) arrival_time: f64,
    pub(crate) end_time: f64,
}

impl TourActivity {
    pub fn new(
        kind: ActivityKind,
        location_id: Option<LocationIdx>,
        time_windows: TimeWindows,
    ) -> Self {
        TourActivity {
            kind,
            location_id,
            setup_duration: 0.0,
            operation_time: 0.0,
            time_windows,
            load_change: Amount::EMPTY,
            arrival_time: 0.0,
            end_time: 0.0,
        }
    }

    pub fn with_durations(mut self, setup_duration: f64, operation_time: f64) -> Self {
        self.setup_duration = setup_duration;
        self.operation_time = operation_time;
        self
    }

    pub fn with_load_change(mut self, load_change: Amount) -> Self {
        self.load_change = load_change;
        self
    }

    pub fn start(vehicle: &Vehicle) -> Self {
        let mut activity = TourActivity::new(
            ActivityKind::Start,
            Some(vehicle.start_location_id()),
            TimeWindows::single(vehicle.earliest_start(), vehicle.latest_end()),
        );
        activity.arrival_time = vehicle.earliest_start();
        activity.end_time = vehicle.earliest_start();
        activity
    }

    pub fn end(vehicle: &Vehicle) -> Self {
        TourActivity::new(
            ActivityKind::End,
            vehicle.end_location_id(),
            TimeWindows::single(vehicle.earliest_start(), vehicle.latest_end()),
        )
    }

    /// Activities serving `job_id`, in route order.
    pub fn for_job(problem: &VehicleRoutingProblem, job_id: JobIdx) -> SmallVec<[TourActivity; 2]> {
        let mut activities = SmallVec::new();

        match problem.job(job_id) {
            Job::Service(service) => {
                let (kind, load_change) = match service.service_type() {
                    ServiceType::Pickup => {
                        (ActivityKind::PickupService(job_id), service.demand().clone())
                    }
                    ServiceType::Delivery => {
                        (ActivityKind::DeliveryService(job_id), -service.demand())
                    }
                };

                activities.push(
                    TourActivity::new(
                        kind,
                        Some(service.location_id()),
                        service.time_windows().clone(),
                    )
                    .with_durations(service.setup_duration(), service.duration())
                    .with_load_change(load_change),
                );
            }
            Job::Shipment(shipment) => {
                let pickup = shipment.pickup();
                let delivery = shipment.delivery();

                activities.push(
                    TourActivity::new(
                        ActivityKind::PickupShipment(job_id),
                        Some(pickup.location_id()),
                        pickup.time_windows().clone(),
                    )
                    .with_durations(pickup.setup_duration(), pickup.duration())
                    .with_load_change(shipment.demand().clone()),
                );
                activities.push(
                    TourActivity::new(
                        ActivityKind::DeliverShipment(job_id),
                        Some(delivery.location_id()),
                        delivery.time_windows().clone(),
                    )
                    .with_durations(delivery.setup_duration(), delivery.duration())
                    .with_load_change(-shipment.demand()),
                );
            }
            Job::Break(break_job) => {
                activities.push(
                    TourActivity::new(
                        ActivityKind::Break(job_id),
                        break_job.location_id(),
                        break_job.time_windows().clone(),
                    )
                    .with_durations(0.0, break_job.duration()),
                );
            }
        }

        activities
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn job_id(&self) -> Option<JobIdx> {
        self.kind.job_id()
    }

    pub fn location_id(&self) -> Option<LocationIdx> {
        self.location_id
    }

    pub fn setup_duration(&self) -> f64 {
        self.setup_duration
    }

    pub fn operation_time(&self) -> f64 {
        self.operation_time
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }

    pub fn load_change(&self) -> &Amount {
        &self.load_change
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Earliest moment the operation may start.
    pub fn theoretical_earliest_start(&self) -> f64 {
        self.time_windows.earliest()
    }

    /// Latest moment the operation may start.
    pub fn theoretical_latest_start(&self) -> f64 {
        self.time_windows.latest()
    }
}
