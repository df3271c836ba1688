use crate::solver::insertion::context::JobInsertionContext;

use super::HardRouteConstraint;

pub struct MaximumActivitiesConstraint;

impl HardRouteConstraint for MaximumActivitiesConstraint {
    fn constraint_name(&self) -> &'static str {
        "maximum_activities"
    }

    fn fulfilled(&self, context: &JobInsertionContext<'_>) -> bool {
        match context.vehicle().maximum_activities() {
            Some(maximum_activities) => {
                let added = if context.job().is_shipment() { 2 } else { 1 };
                context.route().len() + added <= maximum_activities
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::job::JobIdx,
        solver::{insertion::context::JobInsertionContext, solution::route_id::RouteIdx},
        test_utils::{self, TestProblem, TestRoute},
    };

    use super::*;

    #[test]
    fn test_maximum_activities() {
        let mut problem = TestProblem::grid(1, 5);
        problem.maximum_activities = Some(2);
        problem.add_service(1, |_| {});
        problem.add_service(2, |_| {});
        problem.add_shipment(3, 4, |_| {});
        let problem = Arc::new(problem.build());

        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0],
            }],
        );

        let route_id = RouteIdx::new(0);
        assert!(MaximumActivitiesConstraint.fulfilled(&JobInsertionContext::new(&solution, route_id, JobIdx::new(1))));
        assert!(!MaximumActivitiesConstraint.fulfilled(&JobInsertionContext::new(&solution, route_id, JobIdx::new(2))));
    }
}
