use crate::solver::{
    insertion::context::{ActivityInsertionContext, JobInsertionContext},
    solution::activity::TourActivity,
    state::keys::LATEST_OPERATION_START,
};

use super::{ConstraintStatus, HardActivityConstraint};

/// The new activity must start within one of its windows, and the next activity must still be
/// reached before its latest operation start, which covers everything after it.
pub struct TimeWindowConstraint;

impl HardActivityConstraint for TimeWindowConstraint {
    fn constraint_name(&self) -> &'static str {
        "time_windows"
    }

    fn fulfilled(
        &self,
        context: &JobInsertionContext<'_>,
        activity_context: &ActivityInsertionContext<'_>,
    ) -> ConstraintStatus {
        let ActivityInsertionContext {
            prev,
            new_activity,
            next,
            prev_end_time,
            ..
        } = *activity_context;

        let route = context.route();
        let vehicle = context.vehicle();
        let latest_end = vehicle.latest_end();

        // Later positions only leave later.
        if new_activity.earliest_start() > latest_end || new_activity.latest_start() < prev_end_time {
            return ConstraintStatus::NotFulfilledBreak;
        }

        let latest_start_at_next = if next.is_end() {
            latest_end
        } else {
            context.solution.activity_state(
                context.route_id,
                activity_context.next_position(),
                LATEST_OPERATION_START,
            )
        };

        let transport = |from: &TourActivity, to: &TourActivity, departure_time: f64| {
            context
                .problem
                .transport(
                    from.location_id(),
                    to.location_id(),
                    departure_time,
                    route.vehicle_id(),
                    route.driver_id(),
                )
                .duration
        };

        let arrival_time = prev_end_time + transport(prev, new_activity, prev_end_time);
        let Some(operation_start) = new_activity.time_windows().operation_start(arrival_time) else {
            return ConstraintStatus::NotFulfilled;
        };
        let end_time = operation_start + new_activity.duration();

        let travel_to_next = transport(new_activity, next, end_time);
        let latest_start = new_activity
            .time_windows()
            .latest_start_before(latest_start_at_next - travel_to_next - new_activity.duration());

        match latest_start {
            Some(latest_start) if operation_start <= latest_start => {}
            _ => return ConstraintStatus::NotFulfilled,
        }

        if end_time + travel_to_next > latest_start_at_next {
            return ConstraintStatus::NotFulfilled;
        }

        ConstraintStatus::Fulfilled
    }
}
