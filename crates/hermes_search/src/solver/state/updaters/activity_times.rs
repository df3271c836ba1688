use crate::solver::{
    solution::utils::compute_activity_schedule,
    state::{
        keys::{DEPARTURE_TIME, ROUTE_DURATION, WAITING_TIME},
        state_updater::{RouteStateContext, StateEvent, StateEvents, StateUpdater},
    },
};

/// Forward pass writing arrival and end times of every activity, the route duration and the
/// total waiting time.
pub struct UpdateActivityTimes;

impl StateUpdater for UpdateActivityTimes {
    fn name(&self) -> &str {
        "activity_times"
    }

    fn interests(&self) -> StateEvents {
        StateEvents::SEQUENCE_CHANGES
    }

    fn update(&self, context: &mut RouteStateContext<'_>, _event: StateEvent<'_>) {
        let departure_time = context
            .route_state(DEPARTURE_TIME)
            .max(context.vehicle().earliest_start());
        context.set_activity_times(0, departure_time, departure_time);

        let mut previous_end = departure_time;
        let mut arrival_at_end = departure_time;
        let mut waiting_time = 0.0;

        for position in 1..context.route().activities().len() {
            let travel_time = context
                .transport(position - 1, position, previous_end)
                .duration;
            let arrival_time = previous_end + travel_time;
            let (operation_start, end_time) =
                compute_activity_schedule(context.route().activity(position), arrival_time);

            waiting_time += operation_start - arrival_time;
            context.set_activity_times(position, arrival_time, end_time);

            previous_end = end_time;
            arrival_at_end = arrival_time;
        }

        context.put_route_state(ROUTE_DURATION, arrival_at_end - departure_time);
        context.put_route_state(WAITING_TIME, waiting_time);
    }
}
