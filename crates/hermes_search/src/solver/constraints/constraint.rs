use crate::solver::insertion::context::{ActivityInsertionContext, JobInsertionContext};

/// Outcome of a hard activity constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStatus {
    Fulfilled,
    NotFulfilled,
    /// Not fulfilled here nor at any later position of the route.
    NotFulfilledBreak,
}

impl ConstraintStatus {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, ConstraintStatus::Fulfilled)
    }
}

/// Checked once per route, before any position is scanned.
pub trait HardRouteConstraint: Send + Sync {
    fn constraint_name(&self) -> &'static str;

    fn fulfilled(&self, context: &JobInsertionContext<'_>) -> bool;
}

/// Checked for every candidate position.
pub trait HardActivityConstraint: Send + Sync {
    fn constraint_name(&self) -> &'static str;

    fn fulfilled(
        &self,
        context: &JobInsertionContext<'_>,
        activity_context: &ActivityInsertionContext<'_>,
    ) -> ConstraintStatus;
}

pub trait SoftRouteConstraint: Send + Sync {
    fn constraint_name(&self) -> &'static str;

    fn cost(&self, context: &JobInsertionContext<'_>) -> f64;
}

pub trait SoftActivityConstraint: Send + Sync {
    fn constraint_name(&self) -> &'static str;

    fn cost(
        &self,
        context: &JobInsertionContext<'_>,
        activity_context: &ActivityInsertionContext<'_>,
    ) -> f64;
}

pub enum Constraint {
    HardRoute(Box<dyn HardRouteConstraint>),
    HardActivity(Box<dyn HardActivityConstraint>),
    SoftRoute(Box<dyn SoftRouteConstraint>),
    SoftActivity(Box<dyn SoftActivityConstraint>),
}

impl Constraint {
    pub fn constraint_name(&self) -> &'static str {
        match self {
            Constraint::HardRoute(constraint) => constraint.constraint_name(),
            Constraint::HardActivity(constraint) => constraint.constraint_name(),
            Constraint::SoftRoute(constraint) => constraint.constraint_name(),
            Constraint::SoftActivity(constraint) => constraint.constraint_name(),
        }
    }
}
