//! Derived per-route and per-activity values, kept consistent with the activity sequence.
//!
//! Every change of a route sequence goes through [`WorkingSolution`] which calls one of the
//! [`StateManager`] hooks. The hook clears the route states and runs the registered
//! [`StateUpdater`]s in registration order, so producers must be registered before consumers.
//!
//! [`WorkingSolution`]: crate::solver::solution::working_solution::WorkingSolution

pub mod keys;
pub mod route_states;
pub mod state_key;
pub mod state_manager;
pub mod state_updater;
pub mod updaters;

pub use state_key::{StateKey, StateType, StateValue};
pub use state_manager::StateManager;
pub use state_updater::{RouteStateContext, StateEvent, StateEventKind, StateEvents, StateUpdater};
