use super::{
    accept_solution::{AcceptSolution, AcceptSolutionContext},
    greedy_solution_acceptor::GreedySolutionAcceptor,
    schrimpf_acceptor::SchrimpfAcceptor,
    simulated_annealing_acceptor::SimulatedAnnealingAcceptor,
};

pub enum SolutionAcceptor {
    Greedy(GreedySolutionAcceptor),
    Schrimpf(SchrimpfAcceptor),
    SimulatedAnnealing(SimulatedAnnealingAcceptor),
    /// Accepts everything, used by the random walk estimating the initial threshold.
    Any,
}

impl AcceptSolution for SolutionAcceptor {
    fn accept(&self, current_cost: f64, candidate_cost: f64, context: AcceptSolutionContext) -> bool {
        match self {
            SolutionAcceptor::Greedy(acceptor) => {
                acceptor.accept(current_cost, candidate_cost, context)
            }
            SolutionAcceptor::Schrimpf(acceptor) => {
                acceptor.accept(current_cost, candidate_cost, context)
            }
            SolutionAcceptor::SimulatedAnnealing(acceptor) => {
                acceptor.accept(current_cost, candidate_cost, context)
            }
            SolutionAcceptor::Any => true,
        }
    }
}
