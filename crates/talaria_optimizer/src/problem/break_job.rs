use serde::Serialize;

use crate::problem::{location::LocationIdx, time_window::TimeWindows};

/// Driver break bound to a single vehicle.
///
/// Without a location the break is taken wherever the vehicle is after the previous activity.
#[derive(Serialize, Debug, Clone)]
pub struct BreakJob {
    external_id: String,
    location_id: Option<LocationIdx>,
    duration: f64,
    time_windows: TimeWindows,
}

impl BreakJob {
    pub fn new(external_id: impl Into<String>, duration: f64, time_windows: TimeWindows) -> Self {
        BreakJob {
            external_id: external_id.into(),
            location_id: None,
            duration,
            time_windows,
        }
    }

    pub fn with_location(mut self, location_id: usize) -> Self {
        self.location_id = Some(LocationIdx::new(location_id));
        self
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location_id(&self) -> Option<LocationIdx> {
        self.location_id
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }
}
