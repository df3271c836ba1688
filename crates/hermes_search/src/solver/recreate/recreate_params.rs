use serde::{Deserialize, Serialize};

use super::{recreate_strategy::RecreateStrategy, sequential_best_insertion::BestInsertionSortStrategy};

/// Recreate strategies with their selection weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecreateParams {
    pub recreate_strategies: Vec<(RecreateStrategy, u64)>,

    /// Probability to skip a route while searching the position of a job, only used by
    /// sequential best insertion.
    pub blink_rate: f64,

    /// Also offer the jobs that were already unassigned before the ruin to the recreate step.
    /// When disabled, recreate only places the jobs the ruin removed.
    pub reinsert_unassigned: bool,
}

impl Default for RecreateParams {
    fn default() -> Self {
        RecreateParams {
            recreate_strategies: vec![
                (RecreateStrategy::RegretInsertion(2), 2),
                (RecreateStrategy::BestInsertion, 1),
                (
                    RecreateStrategy::SequentialBestInsertion(BestInsertionSortStrategy::Random),
                    2,
                ),
                (
                    RecreateStrategy::SequentialBestInsertion(BestInsertionSortStrategy::Demand),
                    1,
                ),
                (
                    RecreateStrategy::SequentialBestInsertion(BestInsertionSortStrategy::Far),
                    1,
                ),
                (
                    RecreateStrategy::SequentialBestInsertion(BestInsertionSortStrategy::Close),
                    1,
                ),
                (
                    RecreateStrategy::SequentialBestInsertion(BestInsertionSortStrategy::TimeWindow),
                    1,
                ),
            ],
            blink_rate: 0.01,
            reinsert_unassigned: false,
        }
    }
}
