use rand::rngs::SmallRng;

pub struct AcceptSolutionContext<'a> {
    pub iteration: usize,
    pub max_iterations: Option<usize>,
    pub rng: &'a mut SmallRng,
}

/// Decides whether a recreated solution replaces the current one. New best solutions are always
/// accepted by the search, acceptors only see the others.
pub trait AcceptSolution {
    fn accept(&self, current_cost: f64, candidate_cost: f64, context: AcceptSolutionContext) -> bool;
}
