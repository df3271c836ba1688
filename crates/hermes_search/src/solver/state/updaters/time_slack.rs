use crate::solver::state::{
    keys::{LATEST_OPERATION_START, TIME_SLACK},
    state_updater::{RouteStateContext, StateEvent, StateEvents, StateUpdater},
};

/// Backward pass writing, for every activity, the latest operation start that keeps all the
/// following activities and the route end within their windows, and the resulting slack.
///
/// An activity that cannot be delayed at all gets `-inf`, which makes every insertion before
/// it infeasible.
pub struct UpdateTimeSlack;

impl StateUpdater for UpdateTimeSlack {
    fn name(&self) -> &str {
        "time_slack"
    }

    fn interests(&self) -> StateEvents {
        StateEvents::SEQUENCE_CHANGES
    }

    fn update(&self, context: &mut RouteStateContext<'_>, _event: StateEvent<'_>) {
        let end = context.route().activities().len() - 1;
        let latest_end = context.vehicle().latest_end();
        let arrival_at_end = context.route().end().arrival_time();

        context.put_activity_state(LATEST_OPERATION_START, end, latest_end);
        context.put_activity_state(TIME_SLACK, end, latest_end - arrival_at_end);

        let mut next_latest_start = latest_end;
        for position in (0..end).rev() {
            let activity = context.route().activity(position);
            let travel_time = context
                .transport(position, position + 1, activity.end_time())
                .duration;
            let limit = next_latest_start - travel_time - activity.duration();

            let latest_start = activity
                .time_windows()
                .latest_start_before(limit)
                .unwrap_or(f64::NEG_INFINITY);
            let slack = latest_start - activity.operation_start();

            context.put_activity_state(LATEST_OPERATION_START, position, latest_start);
            context.put_activity_state(TIME_SLACK, position, slack);
            next_latest_start = latest_start;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::time_window::TimeWindow,
        solver::{
            solution::route_id::RouteIdx,
            state::keys::{LATEST_OPERATION_START, TIME_SLACK},
        },
        test_utils::{self, TestProblem, TestRoute},
    };

    #[test]
    fn test_latest_start_propagates_backward() {
        let mut problem = TestProblem::grid(1, 10);
        problem.latest_end = Some(100.0);
        problem.add_service(2, |_| {});
        problem.add_service(5, |service| {
            service.add_time_window(TimeWindow::new(0.0, 30.0));
            service.set_duration(5.0);
        });
        let problem = Arc::new(problem.build());

        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1],
            }],
        );
        let route_id = RouteIdx::new(0);

        // The end must be reached by 100, the second stop starts by 30 at the latest.
        assert_eq!(solution.activity_state(route_id, 3, LATEST_OPERATION_START), 100.0);
        assert_eq!(solution.activity_state(route_id, 2, LATEST_OPERATION_START), 30.0);
        assert_eq!(solution.activity_state(route_id, 1, LATEST_OPERATION_START), 27.0);
        assert_eq!(solution.activity_state(route_id, 0, LATEST_OPERATION_START), 25.0);

        assert_eq!(solution.activity_state(route_id, 1, TIME_SLACK), 25.0);
        assert_eq!(solution.activity_state(route_id, 2, TIME_SLACK), 25.0);
    }
}
