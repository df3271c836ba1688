use std::sync::Arc;

use fxhash::FxHashMap;
use jiff::{SignedDuration, Timestamp};
use parking_lot::RwLock;
use serde::Serialize;

use crate::problem::travel_cost_matrix::Cost;

use super::{
    accepted_solution::AcceptedSolution,
    recreate::recreate_strategy::RecreateStrategy,
    ruin::ruin_strategy::RuinStrategy,
    search_listener::{IterationOutcome, IterationStatus, SearchListener},
    solution::working_solution::WorkingSolution,
};

#[derive(Clone, Debug, Serialize)]
pub struct BestCostRow {
    pub timestamp: Timestamp,
    pub run: usize,
    pub iteration: usize,
    pub cost: Cost,
    pub unassigned_jobs: usize,
}

#[derive(Default, Clone, Debug, Serialize)]
pub struct StrategyStatistics {
    pub selected: usize,
    pub accepted: usize,
    pub new_best: usize,
    pub duration: SignedDuration,
}

impl StrategyStatistics {
    fn record(&mut self, status: IterationStatus, duration: SignedDuration) {
        self.selected += 1;
        self.duration += duration;

        match status {
            IterationStatus::NewBest => {
                self.accepted += 1;
                self.new_best += 1;
            }
            IterationStatus::Accepted => self.accepted += 1,
            IterationStatus::Rejected | IterationStatus::Skipped => {}
        }
    }
}

#[derive(Default, Clone, Debug, Serialize)]
pub struct SearchStatistics {
    pub iterations: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub best_cost_evolution: Vec<BestCostRow>,
    pub ruin_strategies: FxHashMap<RuinStrategy, StrategyStatistics>,
    pub recreate_strategies: FxHashMap<RecreateStrategy, StrategyStatistics>,
}

impl SearchStatistics {
    pub fn add_iteration(&mut self, outcome: &IterationOutcome) {
        self.iterations += 1;
        match outcome.status {
            IterationStatus::NewBest | IterationStatus::Accepted => self.accepted += 1,
            IterationStatus::Rejected => self.rejected += 1,
            IterationStatus::Skipped => self.skipped += 1,
        }

        self.ruin_strategies
            .entry(outcome.ruin_strategy)
            .or_default()
            .record(outcome.status, outcome.ruin_duration);
        self.recreate_strategies
            .entry(outcome.recreate_strategy)
            .or_default()
            .record(outcome.status, outcome.recreate_duration);
    }

    pub fn add_best_cost(&mut self, row: BestCostRow) {
        self.best_cost_evolution.push(row);
    }
}

/// Collects iteration counts, strategy usage and the evolution of the best cost of every run.
#[derive(Default, Clone)]
pub struct StatisticsListener {
    statistics: Arc<RwLock<SearchStatistics>>,
}

impl StatisticsListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statistics(&self) -> Arc<RwLock<SearchStatistics>> {
        Arc::clone(&self.statistics)
    }

    fn add_best(&self, run: usize, iteration: usize, best: &AcceptedSolution) {
        self.statistics.write().add_best_cost(BestCostRow {
            timestamp: Timestamp::now(),
            run,
            iteration,
            cost: best.cost,
            unassigned_jobs: best.solution.unassigned_jobs_count(),
        });
    }
}

impl SearchListener for StatisticsListener {
    fn on_search_start(&self, run: usize, initial: &AcceptedSolution) {
        self.add_best(run, 0, initial);
    }

    fn on_iteration_end(&self, _run: usize, outcome: &IterationOutcome, _current: &WorkingSolution) {
        self.statistics.write().add_iteration(outcome);
    }

    fn on_new_best(&self, run: usize, iteration: usize, best: &AcceptedSolution) {
        self.add_best(run, iteration, best);
    }
}
