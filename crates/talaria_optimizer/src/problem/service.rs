use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::problem::{
    amount::Capacity, location::LocationIdx, skill::Skill, time_window::TimeWindows,
};

pub const DEFAULT_PRIORITY: u8 = 2;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Picked up at the location and carried to the end of the route.
    #[default]
    Pickup,
    /// Loaded at the start of the route and dropped at the location.
    Delivery,
}

#[derive(Serialize, Debug, Clone)]
pub struct Service {
    external_id: String,
    service_type: ServiceType,
    location_id: LocationIdx,
    setup_duration: f64,
    duration: f64,
    demand: Capacity,
    time_windows: TimeWindows,
    skills: FxHashSet<Skill>,
    priority: u8,
}

impl Service {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
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

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }

    pub fn has_time_windows(&self) -> bool {
        !self.time_windows.is_empty()
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }
}

pub struct ServiceBuilder {
    external_id: String,
    location_id: LocationIdx,
    service_type: ServiceType,
    setup_duration: f64,
    duration: f64,
    demand: Capacity,
    time_windows: TimeWindows,
    skills: Vec<Skill>,
    priority: u8,
}

impl ServiceBuilder {
    pub fn new(external_id: impl Into<String>, location_id: usize) -> Self {
        ServiceBuilder {
            external_id: external_id.into(),
            location_id: LocationIdx::new(location_id),
            service_type: ServiceType::default(),
            setup_duration: 0.0,
            duration: 0.0,
            demand: Capacity::EMPTY,
            time_windows: TimeWindows::default(),
            skills: Vec::new(),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn set_service_type(&mut self, service_type: ServiceType) -> &mut ServiceBuilder {
        self.service_type = service_type;
        self
    }

    pub fn set_setup_duration(&mut self, setup_duration: f64) -> &mut ServiceBuilder {
        self.setup_duration = setup_duration;
        self
    }

    pub fn set_duration(&mut self, duration: f64) -> &mut ServiceBuilder {
        self.duration = duration;
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut ServiceBuilder {
        self.demand = demand;
        self
    }

    pub fn set_time_windows(&mut self, time_windows: TimeWindows) -> &mut ServiceBuilder {
        self.time_windows = time_windows;
        self
    }

    pub fn set_skills(&mut self, skills: Vec<String>) -> &mut ServiceBuilder {
        self.skills = skills.into_iter().map(Skill::new).collect();
        self
    }

    pub fn set_priority(&mut self, priority: u8) -> &mut ServiceBuilder {
        self.priority = priority;
        self
    }

    pub fn build(self) -> Service {
        Service {
            external_id: self.external_id,
            service_type: self.service_type,
            location_id: self.location_id,
            setup_duration: self.setup_duration,
            duration: self.duration,
            demand: self.demand,
            time_windows: self.time_windows,
            skills: FxHashSet::from_iter(self.skills),
            priority: self.priority,
        }
    }
}
