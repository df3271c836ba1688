use rand::Rng;

use crate::{problem::job::JobIdx, solver::solution::working_solution::WorkingSolution};

use super::ruin_context::RuinContext;

pub trait RuinSolution {
    /// Unassigns at most `context.num_jobs_to_remove` jobs, returns them in removal order.
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng;
}
