use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::{SignedDuration, Timestamp};
use parking_lot::{MappedRwLockReadGuard, Mutex, RwLock, RwLockReadGuard};
use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    acceptor::{
        AcceptSolution, AcceptSolutionContext, SolutionAcceptor,
        greedy_solution_acceptor::GreedySolutionAcceptor, schrimpf_acceptor::SchrimpfAcceptor,
        simulated_annealing_acceptor::SimulatedAnnealingAcceptor,
    },
    error::SearchError,
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    timer_debug,
};

use super::{
    accepted_solution::AcceptedSolution,
    constraints::ConstraintManager,
    objective::{DefaultSolutionCostCalculator, SolutionCostCalculator},
    recreate::{
        recreate_context::RecreateContext, recreate_solution::RecreateSolution,
        recreate_strategy::RecreateStrategy,
    },
    ruin::{ruin_context::RuinContext, ruin_solution::RuinSolution, ruin_strategy::RuinStrategy},
    search_listener::{IterationOutcome, IterationStatus, SearchListener},
    solution::working_solution::WorkingSolution,
    solver_params::{SolverAcceptorStrategy, SolverParams, Termination},
    state::StateManager,
};

type BestSolutionHandler = Arc<Mutex<dyn FnMut(&AcceptedSolution) + Send + 'static>>;

/// Ruin and recreate search.
///
/// One run builds an initial solution and then repeats ruin, recreate and acceptance on a copy of
/// the current solution until a termination is met. A rejected copy is dropped, which leaves the
/// current solution exactly as it was before the ruin. The best solution only changes on a
/// strictly lower cost.
///
/// Runs only read the shared configuration, several of them can run at the same time.
pub struct Search {
    problem: Arc<VehicleRoutingProblem>,
    params: SolverParams,
    state_manager: Arc<StateManager>,
    constraints: Arc<ConstraintManager>,
    objective: Arc<dyn SolutionCostCalculator>,
    listeners: Vec<Arc<dyn SearchListener>>,
    on_best_solution_handler: Option<BestSolutionHandler>,
    best_solution: Arc<RwLock<Option<AcceptedSolution>>>,
    is_stopped: Arc<AtomicBool>,
}

struct SearchState {
    run: usize,
    start: Timestamp,
    iteration: usize,
    iterations_without_improvement: usize,
    max_iterations: Option<usize>,
    current: AcceptedSolution,
    best: AcceptedSolution,
}

struct RuinRecreateResult {
    removed_jobs: usize,
    ruin_duration: SignedDuration,
    recreate_duration: SignedDuration,
}

impl Search {
    /// Validates `params`, the search uses the core state updaters and constraints and the
    /// default objective until replaced.
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: SolverParams) -> Result<Self, SearchError> {
        params.validate()?;

        Ok(Search {
            objective: Arc::new(DefaultSolutionCostCalculator::new(params.unassigned_job_cost)),
            problem,
            params,
            state_manager: Arc::new(StateManager::with_core_updaters()),
            constraints: Arc::new(ConstraintManager::with_core_constraints()),
            listeners: Vec::new(),
            on_best_solution_handler: None,
            best_solution: Arc::new(RwLock::new(None)),
            is_stopped: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn with_state_manager(mut self, state_manager: StateManager) -> Self {
        self.state_manager = Arc::new(state_manager);
        self
    }

    pub fn with_constraints(mut self, constraints: ConstraintManager) -> Self {
        self.constraints = Arc::new(constraints);
        self
    }

    pub fn with_objective<C>(mut self, objective: C) -> Self
    where
        C: SolutionCostCalculator + 'static,
    {
        self.objective = Arc::new(objective);
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    /// Called with every solution that improves on the best one found so far by any run.
    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + 'static,
    {
        self.on_best_solution_handler = Some(Arc::new(Mutex::new(callback)));
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn objective(&self) -> &dyn SolutionCostCalculator {
        self.objective.as_ref()
    }

    /// Best solution published by any run so far.
    pub fn best_solution(&self) -> Option<MappedRwLockReadGuard<'_, AcceptedSolution>> {
        RwLockReadGuard::try_map(self.best_solution.read(), |solution| solution.as_ref()).ok()
    }

    pub(crate) fn set_best_solution(&self, solution: AcceptedSolution) {
        *self.best_solution.write() = Some(solution);
    }

    /// Stops every run after its current iteration.
    pub fn stop(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.is_stopped.load(Ordering::Relaxed)
    }

    pub(crate) fn reset_stop(&self) {
        self.is_stopped.store(false, Ordering::Relaxed);
    }

    pub fn evaluate(&self, solution: WorkingSolution) -> AcceptedSolution {
        let cost_breakdown = self.objective.breakdown(&solution);
        AcceptedSolution {
            cost: cost_breakdown.total(),
            cost_breakdown,
            solution,
        }
    }

    /// Initial solution of the configured construction heuristic.
    pub fn construct_solution(&self, rng: &mut SmallRng) -> WorkingSolution {
        let mut solution =
            WorkingSolution::new(Arc::clone(&self.problem), Arc::clone(&self.state_manager));
        let jobs: Vec<JobIdx> = solution.unassigned_jobs().collect();

        let unassigned = timer_debug!(
            "Construction",
            self.params.construction.recreate_solution(
                &mut solution,
                &jobs,
                RecreateContext {
                    rng,
                    constraints: &self.constraints,
                    params: &self.params.recreate,
                },
            )
        );

        debug!(
            strategy = %self.params.construction,
            unassigned = unassigned.len(),
            routes = solution.non_empty_routes_count(),
            "Constructed initial solution"
        );

        solution
    }

    /// Builds an initial solution and improves it.
    pub fn run(&self, run: usize, seed: u64) -> AcceptedSolution {
        let mut rng = SmallRng::seed_from_u64(seed);
        let initial = self.construct_solution(&mut rng);

        self.improve(run, initial, &mut rng)
    }

    /// Improves `initial` instead of constructing a solution.
    pub fn run_from(&self, run: usize, initial: WorkingSolution, seed: u64) -> AcceptedSolution {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.improve(run, initial, &mut rng)
    }

    #[instrument(skip_all, level = "debug", fields(run = run))]
    fn improve(&self, run: usize, initial: WorkingSolution, rng: &mut SmallRng) -> AcceptedSolution {
        let initial = self.evaluate(initial);
        info!(
            cost = initial.cost,
            unassigned = initial.solution.unassigned_jobs_count(),
            "Search started"
        );

        for listener in &self.listeners {
            listener.on_search_start(run, &initial);
        }
        self.publish_best(&initial);

        let acceptor = self.create_solution_acceptor(&initial, rng);
        let mut state = SearchState {
            run,
            start: Timestamp::now(),
            iteration: 0,
            iterations_without_improvement: 0,
            max_iterations: self.params.max_iterations(),
            best: initial.clone(),
            current: initial,
        };

        while !self.should_terminate(&state) {
            state.iteration += 1;
            for listener in &self.listeners {
                listener.on_iteration_start(run, state.iteration, &state.current.solution);
            }

            let outcome = self.run_iteration(&mut state, &acceptor, rng);

            debug!(
                iteration = outcome.iteration,
                ruin = %outcome.ruin_strategy,
                recreate = %outcome.recreate_strategy,
                removed = outcome.removed_jobs,
                candidate_cost = outcome.candidate_cost,
                status = ?outcome.status,
                "Iteration"
            );
            for listener in &self.listeners {
                listener.on_iteration_end(run, &outcome, &state.current.solution);
            }
        }

        info!(
            iterations = state.iteration,
            cost = state.best.cost,
            unassigned = state.best.solution.unassigned_jobs_count(),
            elapsed = ?Timestamp::now().duration_since(state.start),
            "Search finished"
        );
        for listener in &self.listeners {
            listener.on_search_end(run, state.iteration, &state.best);
        }

        state.best
    }

    fn run_iteration(
        &self,
        state: &mut SearchState,
        acceptor: &SolutionAcceptor,
        rng: &mut SmallRng,
    ) -> IterationOutcome {
        let (ruin_strategy, recreate_strategy) = self.select_strategies(rng);
        let current_cost = state.current.cost;

        let mut candidate = state.current.solution.clone();
        let result = self.ruin_recreate(&mut candidate, ruin_strategy, recreate_strategy, rng);

        let mut outcome = IterationOutcome {
            iteration: state.iteration,
            ruin_strategy,
            recreate_strategy,
            removed_jobs: result.removed_jobs,
            current_cost,
            candidate_cost: current_cost,
            status: IterationStatus::Skipped,
            ruin_duration: result.ruin_duration,
            recreate_duration: result.recreate_duration,
        };

        if result.removed_jobs == 0 {
            warn!(
                iteration = state.iteration,
                ruin = %ruin_strategy,
                "Ruin removed no job, iteration skipped"
            );
            state.iterations_without_improvement += 1;
            return outcome;
        }

        let candidate = self.evaluate(candidate);
        outcome.candidate_cost = candidate.cost;
        trace!(iteration = state.iteration, cost = candidate.cost, "Evaluated");

        let is_best = candidate.cost < state.best.cost;
        let accepted = is_best
            || acceptor.accept(
                current_cost,
                candidate.cost,
                AcceptSolutionContext {
                    iteration: state.iteration,
                    max_iterations: state.max_iterations,
                    rng,
                },
            );

        if !accepted {
            trace!(iteration = state.iteration, "Rejected");
            state.iterations_without_improvement += 1;
            outcome.status = IterationStatus::Rejected;
            return outcome;
        }

        trace!(iteration = state.iteration, "Accepted");
        state.current = candidate;

        if is_best {
            state.iterations_without_improvement = 0;
            state.best = state.current.clone();
            outcome.status = IterationStatus::NewBest;

            info!(
                iteration = state.iteration,
                cost = state.best.cost,
                unassigned = state.best.solution.unassigned_jobs_count(),
                "New best solution"
            );
            for listener in &self.listeners {
                listener.on_new_best(state.run, state.iteration, &state.best);
            }
            self.publish_best(&state.best);
        } else {
            state.iterations_without_improvement += 1;
            outcome.status = IterationStatus::Accepted;
        }

        outcome
    }

    fn ruin_recreate(
        &self,
        solution: &mut WorkingSolution,
        ruin_strategy: RuinStrategy,
        recreate_strategy: RecreateStrategy,
        rng: &mut SmallRng,
    ) -> RuinRecreateResult {
        let started_at = Timestamp::now();
        let num_jobs_to_remove = self.params.ruin.num_jobs_to_remove(solution, rng);
        let mut jobs = ruin_strategy.ruin_solution(
            solution,
            RuinContext {
                params: &self.params.ruin,
                problem: &self.problem,
                rng,
                num_jobs_to_remove,
            },
        );
        let ruin_duration = Timestamp::now().duration_since(started_at);
        let removed_jobs = jobs.len();
        trace!(removed = removed_jobs, "Ruined");

        if removed_jobs == 0 {
            return RuinRecreateResult {
                removed_jobs,
                ruin_duration,
                recreate_duration: SignedDuration::ZERO,
            };
        }

        if self.params.recreate.reinsert_unassigned {
            let previously_unassigned: Vec<JobIdx> = solution
                .unassigned_jobs()
                .filter(|job_id| !jobs.contains(job_id))
                .collect();
            jobs.extend(previously_unassigned);
        }

        let started_at = Timestamp::now();
        recreate_strategy.recreate_solution(
            solution,
            &jobs,
            RecreateContext {
                rng,
                constraints: &self.constraints,
                params: &self.params.recreate,
            },
        );
        trace!("Recreated");

        RuinRecreateResult {
            removed_jobs,
            ruin_duration,
            recreate_duration: Timestamp::now().duration_since(started_at),
        }
    }

    fn select_strategies(&self, rng: &mut SmallRng) -> (RuinStrategy, RecreateStrategy) {
        // Validation guarantees a positive weight in both sets.
        let ruin_strategy = self
            .params
            .ruin_strategies()
            .choose_weighted(rng, |(_, weight)| *weight)
            .map_or(RuinStrategy::Random, |(strategy, _)| *strategy);
        let recreate_strategy = self
            .params
            .recreate_strategies()
            .choose_weighted(rng, |(_, weight)| *weight)
            .map_or(RecreateStrategy::BestInsertion, |(strategy, _)| *strategy);

        (ruin_strategy, recreate_strategy)
    }

    fn create_solution_acceptor(&self, initial: &AcceptedSolution, rng: &mut SmallRng) -> SolutionAcceptor {
        match self.params.solver_acceptor {
            SolverAcceptorStrategy::Greedy => SolutionAcceptor::Greedy(GreedySolutionAcceptor),
            SolverAcceptorStrategy::Schrimpf => {
                let initial_threshold = match self.params.schrimpf_initial_threshold {
                    Some(threshold) => threshold,
                    None => timer_debug!(
                        "Threshold random walk",
                        self.estimate_initial_threshold(initial, rng)
                    ),
                };

                SolutionAcceptor::Schrimpf(SchrimpfAcceptor::new(
                    initial_threshold,
                    self.params.schrimpf_alpha,
                ))
            }
            SolverAcceptorStrategy::SimulatedAnnealing => {
                let start_temperature = self
                    .params
                    .annealing_initial_temperature
                    .unwrap_or_else(|| 0.3 * initial.cost / 0.5_f64.ln().abs());
                debug!(start_temperature, "Simulated annealing");

                SolutionAcceptor::SimulatedAnnealing(SimulatedAnnealingAcceptor::new(
                    start_temperature,
                    self.params.annealing_cooling_rate,
                ))
            }
            SolverAcceptorStrategy::Any => SolutionAcceptor::Any,
        }
    }

    /// Walks from `initial` accepting every recreated solution, the threshold is half the
    /// standard deviation of the visited costs.
    fn estimate_initial_threshold(&self, initial: &AcceptedSolution, rng: &mut SmallRng) -> f64 {
        let mut walk = initial.solution.clone();
        let mut costs = Vec::with_capacity(self.params.random_walk_iterations);

        for _ in 0..self.params.random_walk_iterations {
            let (ruin_strategy, recreate_strategy) = self.select_strategies(rng);
            let result = self.ruin_recreate(&mut walk, ruin_strategy, recreate_strategy, rng);
            if result.removed_jobs > 0 {
                costs.push(self.objective.calculate(&walk));
            }
        }

        if costs.len() < 2 {
            return 0.0;
        }

        let mean = costs.iter().sum::<f64>() / costs.len() as f64;
        let variance =
            costs.iter().map(|cost| (cost - mean).powi(2)).sum::<f64>() / (costs.len() - 1) as f64;
        let std = variance.sqrt();
        let initial_threshold = std / 2.0;

        debug!(mean, variance, std, initial_threshold, "Schrimpf initial threshold");

        initial_threshold
    }

    fn publish_best(&self, best: &AcceptedSolution) {
        {
            let mut slot = self.best_solution.write();
            if slot.as_ref().is_some_and(|published| published.cost <= best.cost) {
                return;
            }
            *slot = Some(best.clone());
        }

        if let Some(callback) = &self.on_best_solution_handler {
            callback.lock()(best);
        }
    }

    fn check_termination(&self, state: &SearchState, termination: &Termination) -> bool {
        match *termination {
            Termination::Iterations(max_iterations) => state.iteration >= max_iterations,
            Termination::Duration(max_duration) => {
                Timestamp::now().duration_since(state.start) >= max_duration
            }
            Termination::IterationsWithoutImprovement(max_iterations_without_improvement) => {
                state.iterations_without_improvement >= max_iterations_without_improvement
            }
            Termination::Cost(target_cost) => state.best.cost <= target_cost,
        }
    }

    fn should_terminate(&self, state: &SearchState) -> bool {
        if self.is_stopped() {
            debug!(iteration = state.iteration, "Search stopped");
            return true;
        }

        self.params.terminations.iter().any(|termination| {
            let met = self.check_termination(state, termination);
            if met {
                debug!(
                    iteration = state.iteration,
                    "Termination condition met: {termination:?}"
                );
            }
            met
        })
    }
}
