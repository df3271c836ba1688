use jiff::SignedDuration;
use serde::Serialize;

use crate::problem::travel_cost_matrix::Cost;

use super::{
    accepted_solution::AcceptedSolution, recreate::recreate_strategy::RecreateStrategy,
    ruin::ruin_strategy::RuinStrategy, solution::working_solution::WorkingSolution,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationStatus {
    /// Replaced the current solution and the best one.
    NewBest,
    Accepted,
    /// Rolled back to the solution before the ruin.
    Rejected,
    /// The ruin removed nothing, the solution is unchanged.
    Skipped,
}

#[derive(Clone, Debug, Serialize)]
pub struct IterationOutcome {
    pub iteration: usize,
    pub ruin_strategy: RuinStrategy,
    pub recreate_strategy: RecreateStrategy,
    pub removed_jobs: usize,
    pub current_cost: Cost,
    pub candidate_cost: Cost,
    pub status: IterationStatus,
    pub ruin_duration: SignedDuration,
    pub recreate_duration: SignedDuration,
}

/// Observer of a search run. Every hook has an empty default.
///
/// Listeners get read-only views and cannot change the course of the search. The same listener
/// is shared by every run of a solver, `run` tells them apart.
pub trait SearchListener: Send + Sync {
    fn on_search_start(&self, _run: usize, _initial: &AcceptedSolution) {}

    fn on_iteration_start(&self, _run: usize, _iteration: usize, _current: &WorkingSolution) {}

    fn on_iteration_end(&self, _run: usize, _outcome: &IterationOutcome, _current: &WorkingSolution) {}

    fn on_new_best(&self, _run: usize, _iteration: usize, _best: &AcceptedSolution) {}

    fn on_search_end(&self, _run: usize, _iterations: usize, _best: &AcceptedSolution) {}
}
