use serde::Deserialize;

use super::{
    cost::unassigned_penalty::UnassignedPenaltyParams,
    recreate::{
        best_insertion::BestInsertionSortStrategy, recreate_params::RecreateParams,
        recreate_strategy::RecreateStrategy,
    },
    ruin::ruin_params::RuinParams,
    search_strategy::{AdaptiveWeightsParams, SearchStrategy},
    termination::termination::Termination,
};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// The search stops as soon as one of them holds.
    pub terminations: Vec<Termination>,
    /// Size of the solution memory.
    pub max_solutions: usize,
    pub solver_acceptor: SolverAcceptorStrategy,
    pub solver_selector: SolverSelectorStrategy,
    pub strategies: Vec<SearchStrategy>,
    /// Insertion strategy building the initial solution.
    pub construction: RecreateStrategy,
    pub ruin: RuinParams,
    pub recreate: RecreateParams,
    pub insertion_threads: Threads,
    pub seed: u64,
    pub penalty: UnassignedPenaltyParams,
    pub schrimpf: SchrimpfParams,
    pub adaptive: Option<AdaptiveWeightsParams>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverAcceptorStrategy {
    Greedy,
    Schrimpf,
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverSelectorStrategy {
    SelectBest,
    SelectRandom,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SchrimpfParams {
    /// Share of the search after which the threshold is halved.
    pub alpha: f64,
    /// Length of the random walk measuring the spread of the solution costs.
    pub warmup_iterations: usize,
}

impl Default for SchrimpfParams {
    fn default() -> Self {
        SchrimpfParams {
            alpha: 0.15,
            warmup_iterations: 100,
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![Termination::Iterations(2000)],
            max_solutions: 10,
            solver_acceptor: SolverAcceptorStrategy::Schrimpf,
            solver_selector: SolverSelectorStrategy::SelectBest,
            strategies: SearchStrategy::default_strategies(),
            construction: RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Random),
            ruin: RuinParams::default(),
            recreate: RecreateParams::default(),
            insertion_threads: Threads::Single,
            seed: 2427121,
            penalty: UnassignedPenaltyParams::default(),
            schrimpf: SchrimpfParams::default(),
            adaptive: None,
        }
    }
}
