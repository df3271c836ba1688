use tracing::debug;

use crate::solver::insertion::context::{ActivityInsertionContext, JobInsertionContext};

use super::{
    ActivityLoadConstraint, Constraint, ConstraintStatus, HardActivityConstraint,
    HardRouteConstraint, MaximumActivitiesConstraint, RouteLoadConstraint, SkillConstraint,
    SoftActivityConstraint, SoftRouteConstraint, TimeWindowConstraint,
};

/// Ordered registry of constraints.
///
/// Hard route constraints are evaluated first and stop at the first failure. Hard activity
/// constraints are then evaluated per position in registration order, again stopping at the
/// first one that is not fulfilled.
#[derive(Default)]
pub struct ConstraintManager {
    hard_route: Vec<Box<dyn HardRouteConstraint>>,
    hard_activity: Vec<Box<dyn HardActivityConstraint>>,
    soft_route: Vec<Box<dyn SoftRouteConstraint>>,
    soft_activity: Vec<Box<dyn SoftActivityConstraint>>,
}

impl ConstraintManager {
    /// Skills, maximum activities, capacity and time windows. The load check is registered
    /// before the time windows so that the shipment delivery scan can rely on it running at
    /// every position.
    pub fn with_core_constraints() -> Self {
        let mut manager = ConstraintManager::default();

        manager
            .add_constraint(Constraint::HardRoute(Box::new(SkillConstraint)))
            .add_constraint(Constraint::HardRoute(Box::new(MaximumActivitiesConstraint)))
            .add_constraint(Constraint::HardRoute(Box::new(RouteLoadConstraint)))
            .add_constraint(Constraint::HardActivity(Box::new(ActivityLoadConstraint)))
            .add_constraint(Constraint::HardActivity(Box::new(TimeWindowConstraint)));

        manager
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> &mut Self {
        debug!(constraint = constraint.constraint_name(), "Registered constraint");
        match constraint {
            Constraint::HardRoute(constraint) => self.hard_route.push(constraint),
            Constraint::HardActivity(constraint) => self.hard_activity.push(constraint),
            Constraint::SoftRoute(constraint) => self.soft_route.push(constraint),
            Constraint::SoftActivity(constraint) => self.soft_activity.push(constraint),
        }
        self
    }

    pub fn fulfilled_route(&self, context: &JobInsertionContext<'_>) -> bool {
        self.hard_route
            .iter()
            .all(|constraint| constraint.fulfilled(context))
    }

    /// Status of the first hard activity constraint that is not fulfilled.
    pub fn fulfilled_activity(
        &self,
        context: &JobInsertionContext<'_>,
        activity_context: &ActivityInsertionContext<'_>,
    ) -> ConstraintStatus {
        for constraint in &self.hard_activity {
            let status = constraint.fulfilled(context, activity_context);
            if !status.is_fulfilled() {
                return status;
            }
        }

        ConstraintStatus::Fulfilled
    }

    pub fn soft_route_cost(&self, context: &JobInsertionContext<'_>) -> f64 {
        self.soft_route
            .iter()
            .map(|constraint| constraint.cost(context))
            .sum()
    }

    pub fn soft_activity_cost(
        &self,
        context: &JobInsertionContext<'_>,
        activity_context: &ActivityInsertionContext<'_>,
    ) -> f64 {
        self.soft_activity
            .iter()
            .map(|constraint| constraint.cost(context, activity_context))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.hard_route.len() + self.hard_activity.len() + self.soft_route.len() + self.soft_activity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use crate::{
        problem::job::{ActivityId, JobIdx},
        solver::{
            insertion::context::{ActivityInsertionContext, JobInsertionContext},
            solution::{activity::TourActivity, route_id::RouteIdx},
        },
        test_utils,
    };

    use super::*;

    struct Counting {
        status: ConstraintStatus,
        calls: Arc<AtomicUsize>,
    }

    impl HardActivityConstraint for Counting {
        fn constraint_name(&self) -> &'static str {
            "counting"
        }

        fn fulfilled(
            &self,
            _context: &JobInsertionContext<'_>,
            _activity_context: &ActivityInsertionContext<'_>,
        ) -> ConstraintStatus {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.status
        }
    }

    #[test]
    fn test_hard_activity_constraints_short_circuit() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            test_utils::create_basic_services(vec![1]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let solution = test_utils::create_test_working_solution(Arc::clone(&problem), vec![]);

        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let mut manager = ConstraintManager::default();
        manager
            .add_constraint(Constraint::HardActivity(Box::new(Counting {
                status: ConstraintStatus::NotFulfilled,
                calls: Arc::clone(&first_calls),
            })))
            .add_constraint(Constraint::HardActivity(Box::new(Counting {
                status: ConstraintStatus::Fulfilled,
                calls: Arc::clone(&second_calls),
            })));

        let route = solution.route(RouteIdx::new(0));
        let new_activity = TourActivity::for_job(&problem, ActivityId::Service(JobIdx::new(0)));
        let context = JobInsertionContext::new(&solution, RouteIdx::new(0), JobIdx::new(0));
        let activity_context = ActivityInsertionContext {
            prev: route.start(),
            new_activity: &new_activity,
            next: route.end(),
            prev_position: 0,
            prev_end_time: 0.0,
        };

        assert_eq!(
            manager.fulfilled_activity(&context, &activity_context),
            ConstraintStatus::NotFulfilled
        );
        assert_eq!(first_calls.load(Ordering::Relaxed), 1);
        assert_eq!(second_calls.load(Ordering::Relaxed), 0);
    }
}
