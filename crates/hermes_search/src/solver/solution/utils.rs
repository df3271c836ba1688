use crate::problem::{
    driver::DriverIdx, vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem,
};

use super::activity::TourActivity;

/// When the vehicle should leave its start when `first` is the first activity of the route.
///
/// Vehicles with a fixed departure always leave at their earliest start. A variable departure
/// is pushed back so the vehicle reaches `first` exactly when its window opens, which removes
/// the waiting there without changing the operation start of any activity.
pub(crate) fn compute_departure_time(
    problem: &VehicleRoutingProblem,
    vehicle_id: VehicleIdx,
    driver_id: Option<DriverIdx>,
    start: &TourActivity,
    first: Option<&TourActivity>,
) -> f64 {
    let vehicle = problem.vehicle(vehicle_id);
    let earliest_start = vehicle.earliest_start();

    let Some(first) = first.filter(|_| vehicle.has_variable_departure()) else {
        return earliest_start;
    };

    let travel_time = problem
        .transport(
            start.location_id(),
            first.location_id(),
            earliest_start,
            vehicle_id,
            driver_id,
        )
        .duration;

    match first
        .time_windows()
        .operation_start(earliest_start + travel_time)
    {
        Some(operation_start) => earliest_start.max(operation_start - travel_time),
        None => earliest_start,
    }
}

/// Operation start and end time of `activity` when the vehicle arrives at `arrival_time`.
/// A closed window does not stop the clock, the operation starts on arrival.
#[inline]
pub(crate) fn compute_activity_schedule(activity: &TourActivity, arrival_time: f64) -> (f64, f64) {
    let operation_start = activity
        .time_windows()
        .operation_start(arrival_time)
        .unwrap_or(arrival_time);

    (operation_start, operation_start + activity.duration())
}
