use std::sync::Arc;

use jiff::Timestamp;
use parking_lot::RwLock;
use serde::Serialize;

use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

use super::{
    accepted_solution::AcceptedSolution,
    cost::cost_component::CostComponent,
    events::event_bus::SearchListener,
    search::Search,
    solution::solution::Solution,
    solver_error::SolverError,
    solver_params::SolverParams,
    termination::termination::Termination,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SolverStatus {
    Pending,
    Running,
    Completed,
}

/// Entry point of the optimizer: runs a search and reports its solutions.
pub struct Solver {
    search: Search,
    status: RwLock<SolverStatus>,
    created_at: Timestamp,
}

impl Solver {
    pub fn new(problem: VehicleRoutingProblem, params: SolverParams) -> Result<Self, SolverError> {
        Self::from_arc(Arc::new(problem), params)
    }

    pub fn from_arc(
        problem: Arc<VehicleRoutingProblem>,
        params: SolverParams,
    ) -> Result<Self, SolverError> {
        Ok(Solver {
            search: Search::new(problem, params)?,
            status: RwLock::new(SolverStatus::Pending),
            created_at: Timestamp::now(),
        })
    }

    pub fn subscribe(&mut self, listener: Arc<dyn SearchListener>) -> &mut Self {
        self.search.subscribe(listener);
        self
    }

    pub fn register_cost_component(
        &mut self,
        component: Box<dyn CostComponent>,
        weight: f64,
    ) -> Result<(), SolverError> {
        self.search.register_cost_component(component, weight)
    }

    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + Sync + 'static,
    {
        self.search.on_best_solution(callback);
    }

    /// Runs the search; solutions come cheapest first.
    pub fn solve(&mut self) -> Result<Vec<Solution>, SolverError> {
        *self.status.write() = SolverStatus::Running;
        let result = self.search.run();
        *self.status.write() = SolverStatus::Completed;

        let states = self.search.states();
        Ok(result?
            .iter()
            .map(|accepted| Solution::from_accepted(states, accepted))
            .collect())
    }

    pub fn status(&self) -> SolverStatus {
        *self.status.read()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn best_solution(&self) -> Option<Solution> {
        self.search
            .best_solution()
            .map(|accepted| Solution::from_accepted(self.search.states(), accepted))
    }
}

/// Runs at most `max_iterations` iterations with the default parameters, stopping earlier when
/// one of `terminations` holds.
pub fn search_solutions(
    problem: Arc<VehicleRoutingProblem>,
    max_iterations: usize,
    terminations: Vec<Termination>,
) -> Result<Vec<Solution>, SolverError> {
    let mut all_terminations = vec![Termination::Iterations(max_iterations)];
    all_terminations.extend(terminations);

    let mut solver = Solver::from_arc(
        problem,
        SolverParams {
            terminations: all_terminations,
            ..SolverParams::default()
        },
    )?;

    solver.solve()
}
