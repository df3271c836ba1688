pub mod accepted_solution;
pub mod constraints;
pub mod insertion;
pub mod objective;
pub mod recreate;
pub mod ruin;
pub mod search;
pub mod search_listener;
pub mod solution;
pub mod solver;
pub mod solver_params;
pub mod state;
pub mod statistics;
