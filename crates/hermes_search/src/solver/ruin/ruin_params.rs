use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::solver::solution::working_solution::WorkingSolution;

use super::ruin_strategy::RuinStrategy;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuinParams {
    pub ruin_strategies: Vec<(RuinStrategy, u64)>,

    /// Between 0.0 and 1.0, fraction of all jobs removed at least by one ruin.
    pub ruin_minimum_ratio: f64,

    /// Between 0.0 and 1.0, where 1.0 means that the ruin may remove every job.
    pub ruin_maximum_ratio: f64,

    /// Higher values make the worst ruin pick the worst jobs more deterministically.
    pub ruin_worst_determinism: f64,

    pub string_maximum_strings: usize,
    pub string_maximum_length: usize,
    /// Probability to keep a substring of the removed string in place.
    pub string_split_probability: f64,
}

impl Default for RuinParams {
    fn default() -> Self {
        RuinParams {
            ruin_strategies: vec![
                (RuinStrategy::Random, 50),
                (RuinStrategy::Worst, 50),
                (RuinStrategy::Radial, 100),
                (RuinStrategy::String, 100),
            ],
            ruin_minimum_ratio: 0.05,
            ruin_maximum_ratio: 0.3,
            ruin_worst_determinism: 4.0,
            string_maximum_strings: 3,
            string_maximum_length: 10,
            string_split_probability: 0.5,
        }
    }
}

impl RuinParams {
    /// Draws how many jobs the next ruin removes: between the minimum and maximum fraction of all
    /// jobs, at least one, and never more than the jobs currently assigned.
    pub fn num_jobs_to_remove<R>(&self, solution: &WorkingSolution, rng: &mut R) -> usize
    where
        R: Rng,
    {
        let assigned = solution.assigned_jobs_count();
        if assigned == 0 {
            return 0;
        }

        let job_count = solution.problem().jobs().len() as f64;
        let minimum = ((self.ruin_minimum_ratio * job_count).ceil() as usize).max(1);
        let maximum = ((self.ruin_maximum_ratio * job_count).ceil() as usize).max(minimum);

        rng.random_range(minimum..=maximum).min(assigned)
    }
}
