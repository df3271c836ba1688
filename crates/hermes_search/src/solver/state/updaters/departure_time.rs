use crate::solver::{
    solution::utils::compute_departure_time,
    state::{
        keys::DEPARTURE_TIME,
        state_updater::{RouteStateContext, StateEvent, StateEvents, StateUpdater},
    },
};

/// Writes [`DEPARTURE_TIME`]. Vehicles with a variable departure leave as late as possible
/// without waiting at their first stop.
pub struct UpdateDepartureTime;

impl StateUpdater for UpdateDepartureTime {
    fn name(&self) -> &str {
        "departure_time"
    }

    fn interests(&self) -> StateEvents {
        StateEvents::SEQUENCE_CHANGES
    }

    fn update(&self, context: &mut RouteStateContext<'_>, _event: StateEvent<'_>) {
        let route = context.route();
        let departure_time = compute_departure_time(
            context.problem(),
            route.vehicle_id(),
            route.driver_id(),
            route.start(),
            route.job_activities().first(),
        );

        context.put_route_state(DEPARTURE_TIME, departure_time);
    }
}
