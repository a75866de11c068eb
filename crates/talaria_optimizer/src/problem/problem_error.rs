use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ProblemError {
    #[error("the problem has no vehicles")]
    NoVehicles,

    #[error("{owner} references location {location} but only {count} locations exist")]
    LocationOutOfRange {
        owner: String,
        location: usize,
        count: usize,
    },

    #[error("travel matrix covers {actual} locations, expected {expected}")]
    MatrixSize { expected: usize, actual: usize },

    #[error("job {job} has priority {priority}, expected 1..=4")]
    InvalidPriority { job: String, priority: u8 },

    #[error("duplicate job id {0}")]
    DuplicateJobId(String),

    #[error("vehicle {vehicle} references unknown break {break_id}")]
    UnknownBreak { vehicle: String, break_id: String },

    #[error("break {0} is not assigned to any vehicle")]
    UnboundBreak(String),

    #[error("break {break_id} is assigned to vehicles {first} and {second}")]
    SharedBreak {
        break_id: String,
        first: String,
        second: String,
    },

    #[error("vehicle {vehicle} has {actual} capacity dimensions but jobs use {expected}")]
    CapacityDimensions {
        vehicle: String,
        expected: usize,
        actual: usize,
    },
}
