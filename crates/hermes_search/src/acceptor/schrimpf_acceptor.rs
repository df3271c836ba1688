use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Threshold accepting, G. Schrimpf et al. "Record Breaking Optimization Results Using the Ruin
/// and Recreate Principle".
///
/// A candidate is accepted when it is less than `threshold(i)` worse than the current solution,
/// with `threshold(i) = initial * exp(-ln(2) * (i / max_iterations) / alpha)`. The threshold halves
/// every `alpha` fraction of the search.
pub struct SchrimpfAcceptor {
    initial_threshold: f64,
    alpha: f64,
}

/// Used for the decay when no iteration limit is configured.
const DEFAULT_MAX_ITERATIONS: usize = 15000;

impl SchrimpfAcceptor {
    pub fn new(initial_threshold: f64, alpha: f64) -> Self {
        SchrimpfAcceptor {
            initial_threshold,
            alpha,
        }
    }

    pub fn initial_threshold(&self) -> f64 {
        self.initial_threshold
    }

    fn compute_threshold(&self, context: &AcceptSolutionContext) -> f64 {
        let max_iterations = context.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS).max(1);
        self.initial_threshold
            * (-(2.0_f64).ln() * (context.iteration as f64 / max_iterations as f64) / self.alpha)
                .exp()
    }
}

impl AcceptSolution for SchrimpfAcceptor {
    fn accept(&self, current_cost: f64, candidate_cost: f64, context: AcceptSolutionContext) -> bool {
        let threshold = self.compute_threshold(&context);
        candidate_cost < current_cost + threshold
    }
}
