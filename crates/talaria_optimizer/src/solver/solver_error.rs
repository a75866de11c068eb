use thiserror::Error;

/// Misconfiguration of a search run. Infeasible jobs are never reported as errors, they end up
/// in the unassigned jobs of the solution.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("state id {0} is already registered")]
    DuplicateStateId(String),

    #[error("cost component {0} is already registered")]
    DuplicateCostComponent(String),

    #[error("cannot register cost component {0}, the cost calculator is sealed")]
    CalculatorSealed(String),

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("weight {0} must be a finite non-negative number")]
    InvalidWeight(f64),

    #[error("no search strategy is registered")]
    NoStrategy,

    #[error("no termination criterion is configured")]
    NoTermination,

    #[error("the solution memory is empty")]
    EmptyMemory,

    #[error("failed to build the insertion thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
