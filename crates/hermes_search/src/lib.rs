mod acceptor;
pub mod error;
pub mod problem;
pub mod solver;
mod utils;

pub use acceptor::{AcceptSolution, AcceptSolutionContext, SolutionAcceptor};

#[cfg(test)]
pub(crate) mod test_utils;
