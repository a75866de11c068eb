use geo::{Distance, Euclidean};
use serde::Serialize;

use crate::define_index_newtype;

define_index_newtype!(LocationIdx, Location);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Location {
    point: geo::Point,
    external_id: Option<String>,
}

impl Location {
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        Self {
            point: geo::Point::new(x, y),
            external_id: None,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn euclidean_distance(&self, to: &Location) -> f64 {
        Euclidean.distance(&self.point, &to.point)
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}
