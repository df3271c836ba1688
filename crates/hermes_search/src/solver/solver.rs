use std::sync::Arc;

use jiff::Timestamp;
use parking_lot::{MappedRwLockReadGuard, RwLock};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use serde::Serialize;
use tracing::info;

use crate::{
    error::{ConfigurationError, SearchError},
    problem::vehicle_routing_problem::VehicleRoutingProblem,
};

use super::{
    accepted_solution::AcceptedSolution,
    search::Search,
    search_listener::SearchListener,
    solution::report::SolutionReport,
    solver_params::SolverParams,
    statistics::{SearchStatistics, StatisticsListener},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SolverStatus {
    Pending,
    Running,
    Completed,
}

/// Runs `params.runs` independent searches on a thread pool and keeps the best result.
///
/// Every run gets its own seed drawn from `params.seed`, so the result only depends on the seed
/// and not on the scheduling of the runs. Equal costs go to the lowest run index.
pub struct Solver {
    search: Search,
    status: RwLock<SolverStatus>,
    created_at: Timestamp,
}

impl Solver {
    pub fn new(problem: VehicleRoutingProblem, params: SolverParams) -> Result<Self, SearchError> {
        Ok(Solver::from_search(Search::new(Arc::new(problem), params)?))
    }

    /// Solver around a search with custom constraints, state updaters or objective.
    pub fn from_search(search: Search) -> Self {
        Solver {
            search,
            status: RwLock::new(SolverStatus::Pending),
            created_at: Timestamp::now(),
        }
    }

    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + 'static,
    {
        self.search.on_best_solution(callback);
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener>) -> &mut Self {
        self.search.add_listener(listener);
        self
    }

    /// Registers a [`StatisticsListener`] and returns its statistics.
    pub fn enable_statistics(&mut self) -> Arc<RwLock<SearchStatistics>> {
        let listener = StatisticsListener::new();
        let statistics = listener.statistics();
        self.search.add_listener(Arc::new(listener));
        statistics
    }

    /// Runs every search, a stop requested before this call does not carry over.
    pub fn solve(&self) -> Result<AcceptedSolution, SearchError> {
        self.search.reset_stop();
        *self.status.write() = SolverStatus::Running;
        let result = self.run_searches();
        *self.status.write() = SolverStatus::Completed;

        result
    }

    fn run_searches(&self) -> Result<AcceptedSolution, SearchError> {
        let params = self.search.params();

        let mut rng = SmallRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.runs).map(|_| rng.random()).collect();

        let threads = params.threads.number_of_threads().min(params.runs).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|error| ConfigurationError::InvalidValue {
                parameter: "threads".to_owned(),
                value: error.to_string(),
            })?;

        info!(runs = params.runs, threads, seed = params.seed, "Solving");
        let started_at = Timestamp::now();

        let results: Vec<AcceptedSolution> = pool.install(|| {
            seeds
                .into_par_iter()
                .enumerate()
                .map(|(run, seed)| self.search.run(run, seed))
                .collect()
        });

        let best = results
            .into_iter()
            .reduce(|best, candidate| {
                if candidate.cost < best.cost {
                    candidate
                } else {
                    best
                }
            })
            .ok_or(ConfigurationError::OutOfRange {
                parameter: "runs",
                value: 0.0,
                expected: "at least 1",
            })?;

        info!(
            cost = best.cost,
            unassigned = best.solution.unassigned_jobs_count(),
            routes = best.solution.non_empty_routes_count(),
            elapsed = ?Timestamp::now().duration_since(started_at),
            "Solved"
        );

        self.search.set_best_solution(best.clone());
        Ok(best)
    }

    pub fn stop(&self) {
        self.search.stop();
    }

    pub fn status(&self) -> SolverStatus {
        *self.status.read()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn current_best_solution(&self) -> Option<MappedRwLockReadGuard<'_, AcceptedSolution>> {
        self.search.best_solution()
    }

    pub fn report(&self) -> Option<SolutionReport> {
        self.current_best_solution()
            .map(|best| SolutionReport::new(&best.solution, best.cost_breakdown))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{
        solver::solver_params::{SolverAcceptorStrategy, Termination, Threads},
        test_utils,
    };

    use super::*;

    fn create_problem() -> VehicleRoutingProblem {
        test_utils::create_test_problem(
            test_utils::create_location_grid(6, 6),
            test_utils::create_basic_services(vec![1, 5, 8, 14, 17, 22, 27, 30, 33, 35]),
            test_utils::create_basic_vehicles(vec![0, 35]),
        )
    }

    fn create_params(runs: usize) -> SolverParams {
        SolverParams {
            terminations: vec![Termination::Iterations(40)],
            solver_acceptor: SolverAcceptorStrategy::SimulatedAnnealing,
            runs,
            threads: Threads::Multi(2),
            seed: 17,
            ..SolverParams::default()
        }
    }

    #[test]
    fn test_solve_is_deterministic_for_a_seed() {
        let first = Solver::new(create_problem(), create_params(3)).unwrap().solve().unwrap();
        let second = Solver::new(create_problem(), create_params(3)).unwrap().solve().unwrap();

        assert_eq!(first.cost, second.cost);
        assert!(first.solution.is_identical(&second.solution));
    }

    #[test]
    fn test_solve_keeps_best_of_runs() {
        let single = Solver::new(create_problem(), create_params(1)).unwrap().solve().unwrap();
        let solver = Solver::new(create_problem(), create_params(3)).unwrap();
        let best = solver.solve().unwrap();

        assert_eq!(solver.status(), SolverStatus::Completed);
        assert_eq!(solver.current_best_solution().map(|solution| solution.cost), Some(best.cost));
        assert!(best.solution.check_integrity().is_ok());
        // The first run uses the same seed in both solvers.
        assert!(best.cost <= single.cost);
    }

    #[test]
    fn test_best_solution_callback_and_statistics() {
        let mut solver = Solver::new(create_problem(), create_params(2)).unwrap();
        let statistics = solver.enable_statistics();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        solver.on_best_solution(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        assert_eq!(solver.status(), SolverStatus::Pending);
        solver.solve().unwrap();

        assert!(calls.load(Ordering::Relaxed) >= 1);
        let statistics = statistics.read();
        assert_eq!(statistics.iterations, 80);
        assert!(!statistics.best_cost_evolution.is_empty());

        let report = solver.report().unwrap();
        assert!(report.unassigned_jobs.is_empty());
    }

    #[test]
    fn test_stopped_solver_can_solve_again() {
        let mut solver = Solver::new(create_problem(), create_params(2)).unwrap();
        let statistics = solver.enable_statistics();

        solver.stop();
        let first = solver.solve().unwrap();
        assert_eq!(statistics.read().iterations, 80);

        solver.stop();
        let second = solver.solve().unwrap();
        assert_eq!(statistics.read().iterations, 160);

        assert_eq!(solver.status(), SolverStatus::Completed);
        assert_eq!(first.cost, second.cost);
    }
}
