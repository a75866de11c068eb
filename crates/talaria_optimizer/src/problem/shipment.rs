use fxhash::FxHashSet;
use serde::Serialize;

use crate::problem::{
    amount::Capacity, location::LocationIdx, service::DEFAULT_PRIORITY, skill::Skill,
    time_window::TimeWindows,
};

/// One leg of a shipment.
#[derive(Serialize, Debug, Clone)]
pub struct ShipmentTask {
    location_id: LocationIdx,
    setup_duration: f64,
    duration: f64,
    time_windows: TimeWindows,
}

impl ShipmentTask {
    pub fn new(location_id: usize) -> Self {
        ShipmentTask {
            location_id: LocationIdx::new(location_id),
            setup_duration: 0.0,
            duration: 0.0,
            time_windows: TimeWindows::default(),
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_setup_duration(mut self, setup_duration: f64) -> Self {
        self.setup_duration = setup_duration;
        self
    }

    pub fn with_time_windows(mut self, time_windows: TimeWindows) -> Self {
        self.time_windows = time_windows;
        self
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn setup_duration(&self) -> f64 {
        self.setup_duration
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }

    pub fn has_time_windows(&self) -> bool {
        !self.time_windows.is_empty()
    }
}

/// Paired pickup and delivery served by the same vehicle, pickup first.
#[derive(Serialize, Debug, Clone)]
pub struct Shipment {
    external_id: String,
    demand: Capacity,
    pickup: ShipmentTask,
    delivery: ShipmentTask,
    skills: FxHashSet<Skill>,
    priority: u8,
}

impl Shipment {
    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn pickup(&self) -> &ShipmentTask {
        &self.pickup
    }

    pub fn delivery(&self) -> &ShipmentTask {
        &self.delivery
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn has_time_windows(&self) -> bool {
        self.pickup.has_time_windows() || self.delivery.has_time_windows()
    }
}

pub struct ShipmentBuilder {
    external_id: String,
    pickup: ShipmentTask,
    delivery: ShipmentTask,
    demand: Capacity,
    skills: Vec<Skill>,
    priority: u8,
}

impl ShipmentBuilder {
    pub fn new(external_id: impl Into<String>, pickup: ShipmentTask, delivery: ShipmentTask) -> Self {
        ShipmentBuilder {
            external_id: external_id.into(),
            pickup,
            delivery,
            demand: Capacity::EMPTY,
            skills: Vec::new(),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut ShipmentBuilder {
        self.demand = demand;
        self
    }

    pub fn set_skills(&mut self, skills: Vec<String>) -> &mut ShipmentBuilder {
        self.skills = skills.into_iter().map(Skill::new).collect();
        self
    }

    pub fn set_priority(&mut self, priority: u8) -> &mut ShipmentBuilder {
        self.priority = priority;
        self
    }

    pub fn build(self) -> Shipment {
        Shipment {
            external_id: self.external_id,
            demand: self.demand,
            pickup: self.pickup,
            delivery: self.delivery,
            skills: FxHashSet::from_iter(self.skills),
            priority: self.priority,
        }
    }
}
