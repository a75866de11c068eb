use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    define_index_newtype,
    problem::{amount::Capacity, job::Job, location::LocationIdx, skill::Skill},
};

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VehicleCosts {
    pub fixed: f64,
    pub per_distance: f64,
    pub per_time: f64,
    pub per_waiting: f64,
    pub per_lateness: f64,
}

impl Default for VehicleCosts {
    fn default() -> Self {
        VehicleCosts {
            fixed: 0.0,
            per_distance: 1.0,
            per_time: 0.0,
            per_waiting: 0.0,
            per_lateness: 0.0,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    external_id: String,
    start_location_id: LocationIdx,
    end_location_id: Option<LocationIdx>,
    earliest_start: f64,
    latest_end: f64,
    capacity: Capacity,
    costs: VehicleCosts,
    skills: FxHashSet<Skill>,
    break_id: Option<String>,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn start_location_id(&self) -> LocationIdx {
        self.start_location_id
    }

    /// `None` for open routes, which end at the last served activity.
    pub fn end_location_id(&self) -> Option<LocationIdx> {
        self.end_location_id
    }

    pub fn earliest_start(&self) -> f64 {
        self.earliest_start
    }

    pub fn latest_end(&self) -> f64 {
        self.latest_end
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    pub fn costs(&self) -> &VehicleCosts {
        &self.costs
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    /// External id of the break this vehicle must take.
    pub fn break_id(&self) -> Option<&str> {
        self.break_id.as_deref()
    }

    pub fn is_compatible_with(&self, job: &Job) -> bool {
        job.skills().is_subset(&self.skills)
    }
}

pub struct VehicleBuilder {
    external_id: String,
    start_location_id: LocationIdx,
    end_location_id: Option<LocationIdx>,
    should_return_to_depot: bool,
    earliest_start: f64,
    latest_end: f64,
    capacity: Capacity,
    costs: VehicleCosts,
    skills: Vec<Skill>,
    break_id: Option<String>,
}

impl VehicleBuilder {
    pub fn new(external_id: impl Into<String>, start_location_id: usize) -> Self {
        VehicleBuilder {
            external_id: external_id.into(),
            start_location_id: LocationIdx::new(start_location_id),
            end_location_id: None,
            should_return_to_depot: true,
            earliest_start: 0.0,
            latest_end: f64::MAX,
            capacity: Capacity::EMPTY,
            costs: VehicleCosts::default(),
            skills: Vec::new(),
            break_id: None,
        }
    }

    pub fn set_end_location_id(&mut self, end_location_id: usize) -> &mut VehicleBuilder {
        self.end_location_id = Some(end_location_id.into());
        self
    }

    /// Without an explicit end location, `true` returns to the start location and `false`
    /// makes the route open.
    pub fn set_return(&mut self, should_return_to_depot: bool) -> &mut VehicleBuilder {
        self.should_return_to_depot = should_return_to_depot;
        self
    }

    pub fn set_earliest_start(&mut self, earliest_start: f64) -> &mut VehicleBuilder {
        self.earliest_start = earliest_start;
        self
    }

    pub fn set_latest_end(&mut self, latest_end: f64) -> &mut VehicleBuilder {
        self.latest_end = latest_end;
        self
    }

    pub fn set_capacity(&mut self, capacity: Capacity) -> &mut VehicleBuilder {
        self.capacity = capacity;
        self
    }

    pub fn set_costs(&mut self, costs: VehicleCosts) -> &mut VehicleBuilder {
        self.costs = costs;
        self
    }

    pub fn set_fixed_cost(&mut self, fixed: f64) -> &mut VehicleBuilder {
        self.costs.fixed = fixed;
        self
    }

    pub fn set_skills(&mut self, skills: Vec<String>) -> &mut VehicleBuilder {
        self.skills = skills.into_iter().map(Skill::new).collect();
        self
    }

    pub fn set_break_id(&mut self, break_id: impl Into<String>) -> &mut VehicleBuilder {
        self.break_id = Some(break_id.into());
        self
    }

    pub fn build(self) -> Vehicle {
        let end_location_id = match self.end_location_id {
            Some(end) => Some(end),
            None if self.should_return_to_depot => Some(self.start_location_id),
            None => None,
        };

        Vehicle {
            external_id: self.external_id,
            start_location_id: self.start_location_id,
            end_location_id,
            earliest_start: self.earliest_start,
            latest_end: self.latest_end,
            capacity: self.capacity,
            costs: self.costs,
            skills: FxHashSet::from_iter(self.skills),
            break_id: self.break_id,
        }
    }
}
