use std::sync::Arc;

use parking_lot::Mutex;
use rand::{SeedableRng, rngs::SmallRng};
use tracing::{debug, info};

use crate::{
    acceptor::{
        accept_solution::{AcceptSolution, AcceptSolutionContext},
        greedy_solution_acceptor::GreedySolutionAcceptor,
        schrimpf_acceptor::SchrimpfAcceptor,
        solution_acceptor::SolutionAcceptor,
    },
    problem::{travel_cost_matrix::Cost, vehicle_routing_problem::VehicleRoutingProblem},
    selector::{
        select_best_selector::SelectBestSelector, select_random_selector::SelectRandomSelector,
        select_solution::SelectSolution, solution_selector::SolutionSelector,
    },
    timer_debug,
};

use super::{
    accepted_solution::AcceptedSolution,
    constraints::hard_constraints::HardConstraints,
    cost::{cost_component::CostComponent, solution_cost_calculator::SolutionCostCalculator},
    events::{
        event_bus::{EventBus, SearchListener},
        search_event::SearchEvent,
    },
    recreate::{recreate_context::RecreateContext, recreate_solution::RecreateSolution},
    ruin::{ruin_context::RuinContext, ruin_solution::RuinSolution},
    search_strategy::{SearchStrategy, StrategyOutcome, StrategyWeights},
    solution::{solution_memory::SolutionMemory, working_solution::WorkingSolution},
    solver_error::SolverError,
    solver_params::{SolverAcceptorStrategy, SolverParams, SolverSelectorStrategy},
    state::state_manager::StateManager,
    termination::{termination::Termination, termination_state::TerminationState},
};

type BestSolutionHandler = Arc<Mutex<dyn FnMut(&AcceptedSolution) + Send + Sync + 'static>>;

/// Ruin and recreate search over a bounded memory of solutions.
///
/// Every iteration picks a strategy, applies it to a solution selected from the memory, scores
/// the candidate and lets the acceptor decide whether it joins the memory. The best solution is
/// tracked apart from the memory, an acceptor evicting it never loses it.
pub struct Search {
    problem: Arc<VehicleRoutingProblem>,
    params: SolverParams,
    states: StateManager,
    constraints: HardConstraints,
    cost_calculator: SolutionCostCalculator,
    events: EventBus,
    insertion_thread_pool: Option<rayon::ThreadPool>,
    initial_solution: Option<WorkingSolution>,
    best_solution: Option<AcceptedSolution>,
    on_best_solution_handler: Option<BestSolutionHandler>,
    /// Jobs a ruin may remove, breaks excluded.
    num_jobs: usize,
}

impl Search {
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: SolverParams) -> Result<Self, SolverError> {
        if params.terminations.is_empty() {
            return Err(SolverError::NoTermination);
        }

        // Fails fast on an invalid strategy mix
        StrategyWeights::new(params.strategies.clone(), params.adaptive.clone())?;

        let num_threads = params.insertion_threads.number_of_threads();
        let insertion_thread_pool = if num_threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()?,
            )
        } else {
            None
        };

        let num_jobs = problem
            .jobs()
            .iter()
            .filter(|job| !job.is_break())
            .count();

        Ok(Search {
            cost_calculator: SolutionCostCalculator::with_default_components(&params.penalty),
            problem,
            params,
            states: StateManager::new(),
            constraints: HardConstraints::with_default_constraints(),
            events: EventBus::default(),
            insertion_thread_pool,
            initial_solution: None,
            best_solution: None,
            on_best_solution_handler: None,
            num_jobs,
        })
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn states(&self) -> &StateManager {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut StateManager {
        &mut self.states
    }

    pub fn constraints_mut(&mut self) -> &mut HardConstraints {
        &mut self.constraints
    }

    /// Adds a cost component; fails once the search has run.
    pub fn register_cost_component(
        &mut self,
        component: Box<dyn CostComponent>,
        weight: f64,
    ) -> Result<(), SolverError> {
        self.cost_calculator.register(component, weight)
    }

    pub fn subscribe(&mut self, listener: Arc<dyn SearchListener>) -> &mut Self {
        self.events.subscribe(listener);
        self
    }

    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + Sync + 'static,
    {
        self.on_best_solution_handler = Some(Arc::new(Mutex::new(callback)));
    }

    /// Starts the search from this solution instead of constructing one.
    pub fn set_initial_solution(&mut self, solution: WorkingSolution) {
        self.initial_solution = Some(solution);
    }

    pub fn best_solution(&self) -> Option<&AcceptedSolution> {
        self.best_solution.as_ref()
    }

    /// Runs the search and returns the remembered solutions and the best one, cheapest first.
    pub fn run(&mut self) -> Result<Vec<AcceptedSolution>, SolverError> {
        self.cost_calculator.seal();
        let mut termination_state = TerminationState::new(&self.params.terminations);

        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let mut weights =
            StrategyWeights::new(self.params.strategies.clone(), self.params.adaptive.clone())?;
        let max_iterations = Termination::max_iterations(&self.params.terminations);
        let selector = self.create_solution_selector();

        info!(
            jobs = self.problem.job_count(),
            vehicles = self.problem.vehicles().len(),
            "Starting search"
        );
        self.events
            .emit(|| SearchEvent::SearchStarted { max_iterations });

        let initial_solution = match self.initial_solution.take() {
            Some(solution) => solution,
            None => timer_debug!("Construction", self.construct_solution(&mut rng)),
        };
        let initial_solution = self.accept_solution(initial_solution);
        debug!(cost = initial_solution.cost, "Initial solution");

        let acceptor = self.create_solution_acceptor(
            &initial_solution,
            &weights,
            &termination_state,
            &mut rng,
        );

        self.update_best_solution(&initial_solution, 0);
        let mut memory = SolutionMemory::new(self.params.max_solutions);
        let _ = memory.insert(initial_solution);

        loop {
            if let Some(termination) = termination_state.should_terminate(&self.params.terminations)
            {
                info!(
                    iterations = termination_state.iteration(),
                    ?termination,
                    "Search terminated"
                );
                break;
            }

            let iteration = termination_state.iteration();
            self.events
                .emit(|| SearchEvent::IterationStarted { iteration });

            let strategy_index = weights.select(&mut rng);
            let strategy = *weights.strategy(strategy_index);
            self.events.emit(|| SearchEvent::StrategySelected {
                iteration,
                strategy: strategy.to_string(),
            });

            let Some(base) = selector.select_solution(&memory, &mut rng) else {
                return Err(SolverError::EmptyMemory);
            };
            let base_cost = base.cost;
            let mut solution = base.solution.clone();

            self.ruin_and_recreate(&mut solution, &strategy, &self.events, &mut rng);
            let candidate = self.accept_solution(solution);
            let candidate_cost = candidate.cost;

            let best_cost = self.best_cost();
            let is_best = best_cost.is_none_or(|best_cost| candidate_cost < best_cost);
            let accepted = is_best
                || acceptor.accept(
                    &memory,
                    candidate_cost,
                    AcceptSolutionContext {
                        iteration,
                        max_iterations,
                    },
                );

            self.events.emit(|| SearchEvent::AcceptanceDecision {
                iteration,
                cost: candidate_cost,
                accepted,
            });

            if is_best {
                self.update_best_solution(&candidate, iteration);
            }

            if accepted {
                // An identical solution is already remembered
                let _ = memory.insert(candidate);
            }

            let outcome = StrategyOutcome {
                is_best,
                improved: candidate_cost < base_cost,
                accepted,
            };
            weights.record(strategy_index, outcome);
            weights.end_iteration(iteration);

            termination_state
                .complete_iteration(self.best_cost().unwrap_or(candidate_cost), &outcome);

            self.events.emit(|| SearchEvent::IterationCompleted {
                iteration,
                cost: candidate_cost,
            });
        }

        let best_cost = self.best_cost();
        self.events.emit(|| SearchEvent::SearchEnded {
            iterations: termination_state.iteration(),
            best_cost,
        });
        info!(
            iterations = termination_state.iteration(),
            best_cost,
            elapsed = ?termination_state.elapsed(),
            "Search completed"
        );

        let mut solutions = memory.into_solutions();
        if let Some(best) = &self.best_solution
            && !solutions.iter().any(|accepted| {
                accepted.cost == best.cost && accepted.solution.is_identical(&best.solution)
            })
        {
            solutions.push(best.clone());
        }
        solutions.sort_by(|a, b| a.cost.total_cmp(&b.cost));

        Ok(solutions)
    }

    fn best_cost(&self) -> Option<Cost> {
        self.best_solution.as_ref().map(|best| best.cost)
    }

    fn update_best_solution(&mut self, candidate: &AcceptedSolution, iteration: usize) {
        debug!(
            iteration,
            cost = candidate.cost,
            unassigned = candidate.solution.unassigned_jobs().len(),
            "New best solution"
        );

        self.events.emit(|| SearchEvent::NewBestSolution {
            iteration,
            cost: candidate.cost,
        });

        if let Some(callback) = &self.on_best_solution_handler {
            callback.lock()(candidate);
        }

        self.best_solution = Some(candidate.clone());
    }

    fn construct_solution(&self, rng: &mut SmallRng) -> WorkingSolution {
        let mut solution = WorkingSolution::new(Arc::clone(&self.problem));
        let mut context = RecreateContext::new(
            rng,
            &self.problem,
            &self.states,
            &self.constraints,
            &self.params.recreate,
            self.insertion_thread_pool.as_ref(),
            &self.events,
        );

        self.params
            .construction
            .recreate_solution(&mut solution, &mut context);

        solution
    }

    /// Scores a solution after refreshing its stale routes.
    fn accept_solution(&self, mut solution: WorkingSolution) -> AcceptedSolution {
        self.states.refresh_solution(&mut solution);
        let cost_analysis = self.cost_calculator.calculate(&self.states, &solution);

        AcceptedSolution {
            solution,
            cost: cost_analysis.total,
            cost_analysis,
        }
    }

    fn ruin_and_recreate(
        &self,
        solution: &mut WorkingSolution,
        strategy: &SearchStrategy,
        events: &EventBus,
        rng: &mut SmallRng,
    ) {
        let num_jobs_to_remove = self.params.ruin.num_jobs_to_remove(self.num_jobs, rng);

        strategy.ruin.ruin_solution(
            solution,
            RuinContext {
                params: &self.params.ruin,
                problem: &self.problem,
                states: &self.states,
                events,
                rng,
                num_jobs_to_remove,
            },
        );

        let mut context = RecreateContext::new(
            rng,
            &self.problem,
            &self.states,
            &self.constraints,
            &self.params.recreate,
            self.insertion_thread_pool.as_ref(),
            events,
        );
        strategy.recreate.recreate_solution(solution, &mut context);
    }

    fn create_solution_selector(&self) -> SolutionSelector {
        match self.params.solver_selector {
            SolverSelectorStrategy::SelectBest => SolutionSelector::SelectBest(SelectBestSelector),
            SolverSelectorStrategy::SelectRandom => {
                SolutionSelector::SelectRandom(SelectRandomSelector)
            }
        }
    }

    fn create_solution_acceptor(
        &self,
        initial_solution: &AcceptedSolution,
        weights: &StrategyWeights,
        termination_state: &TerminationState,
        rng: &mut SmallRng,
    ) -> SolutionAcceptor {
        match self.params.solver_acceptor {
            SolverAcceptorStrategy::Greedy => SolutionAcceptor::Greedy(GreedySolutionAcceptor),
            SolverAcceptorStrategy::Schrimpf => {
                let initial_threshold = self.schrimpf_initial_threshold(
                    initial_solution,
                    weights,
                    termination_state,
                    rng,
                );
                SolutionAcceptor::Schrimpf(SchrimpfAcceptor::new(
                    initial_threshold,
                    self.params.schrimpf.alpha,
                ))
            }
            SolverAcceptorStrategy::Any => SolutionAcceptor::Any,
        }
    }

    /// Random walk from the initial solution accepting every candidate. The initial threshold is
    /// half the standard deviation of the costs met along the walk.
    ///
    /// The walk draws from its own generator, seeded from the main one, and emits no events. It
    /// counts against the time limit of the run and stops early once that limit is reached.
    fn schrimpf_initial_threshold(
        &self,
        initial_solution: &AcceptedSolution,
        weights: &StrategyWeights,
        termination_state: &TerminationState,
        rng: &mut SmallRng,
    ) -> f64 {
        let mut walk_rng = SmallRng::from_rng(rng);
        let silent = EventBus::default();
        let random_walks = self.params.schrimpf.warmup_iterations;

        let mut costs = Vec::with_capacity(random_walks + 1);
        costs.push(initial_solution.cost);

        let mut solution = initial_solution.solution.clone();
        for _ in 0..random_walks {
            if termination_state.is_out_of_time(&self.params.terminations) {
                debug!(walked = costs.len() - 1, "Schrimpf warm-up stopped by the time limit");
                break;
            }

            let strategy = weights.strategy(weights.select(&mut walk_rng));
            self.ruin_and_recreate(&mut solution, strategy, &silent, &mut walk_rng);
            self.states.refresh_solution(&mut solution);
            costs.push(self.cost_calculator.calculate(&self.states, &solution).total);
        }

        let initial_threshold = half_standard_deviation(&costs);

        debug!(
            random_walks,
            initial_threshold, "Schrimpf initial threshold"
        );

        initial_threshold
    }
}

/// Half the sample standard deviation, zero with fewer than two values.
fn half_standard_deviation(costs: &[Cost]) -> f64 {
    if costs.len() < 2 {
        return 0.0;
    }

    let mean = costs.iter().sum::<f64>() / costs.len() as f64;
    let variance =
        costs.iter().map(|cost| (cost - mean).powi(2)).sum::<f64>() / (costs.len() - 1) as f64;

    variance.sqrt() / 2.0
}
