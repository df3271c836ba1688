pub mod best_insertion;
pub mod recreate_context;
pub mod recreate_params;
pub mod recreate_solution;
pub mod recreate_strategy;
pub mod regret_insertion;
pub mod sequential_best_insertion;
