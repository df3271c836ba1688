use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Accepts candidates that are at least as good as the current solution.
pub struct GreedySolutionAcceptor;

impl AcceptSolution for GreedySolutionAcceptor {
    fn accept(&self, current_cost: f64, candidate_cost: f64, _: AcceptSolutionContext) -> bool {
        candidate_cost <= current_cost
    }
}
