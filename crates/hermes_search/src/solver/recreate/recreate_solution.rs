use crate::{problem::job::JobIdx, solver::solution::working_solution::WorkingSolution};

use super::recreate_context::RecreateContext;

pub trait RecreateSolution {
    /// Inserts `jobs`, which must all be unassigned, and returns the ones no route could take in
    /// ascending order.
    fn recreate_solution(
        &self,
        solution: &mut WorkingSolution,
        jobs: &[JobIdx],
        context: RecreateContext,
    ) -> Vec<JobIdx>;
}
