use crate::problem::travel_cost_matrix::Cost;

use super::{objective::CostBreakdown, solution::working_solution::WorkingSolution};

#[derive(Clone)]
pub struct AcceptedSolution {
    pub solution: WorkingSolution,
    pub cost: Cost,
    pub cost_breakdown: CostBreakdown,
}

impl AcceptedSolution {
    pub fn has_unassigned(&self) -> bool {
        self.solution.unassigned_jobs_count() > 0
    }
}
