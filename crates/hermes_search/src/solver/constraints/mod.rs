//! Feasibility checks and soft penalties evaluated by the insertion heuristics.
//!
//! Constraints only read the route states, they never change them.

mod constraint;
mod constraint_manager;
mod load_constraint;
mod maximum_activities_constraint;
mod new_route_penalty;
mod skill_constraint;
mod time_window_constraint;
mod waiting_time_penalty;

pub use constraint::{
    Constraint, ConstraintStatus, HardActivityConstraint, HardRouteConstraint,
    SoftActivityConstraint, SoftRouteConstraint,
};
pub use constraint_manager::ConstraintManager;
pub use load_constraint::{ActivityLoadConstraint, RouteLoadConstraint};
pub use maximum_activities_constraint::MaximumActivitiesConstraint;
pub use new_route_penalty::NewRoutePenalty;
pub use skill_constraint::SkillConstraint;
pub use time_window_constraint::TimeWindowConstraint;
pub use waiting_time_penalty::WaitingTimePenalty;
