use crate::solver::insertion::context::{ActivityInsertionContext, JobInsertionContext};

use super::SoftActivityConstraint;

/// Penalizes the time spent waiting for the window of the new activity to open, on top of what
/// the activity cost model already charges.
pub struct WaitingTimePenalty {
    weight: f64,
}

impl WaitingTimePenalty {
    pub fn new(weight: f64) -> Self {
        WaitingTimePenalty { weight }
    }
}

impl SoftActivityConstraint for WaitingTimePenalty {
    fn constraint_name(&self) -> &'static str {
        "waiting_time_penalty"
    }

    fn cost(
        &self,
        context: &JobInsertionContext<'_>,
        activity_context: &ActivityInsertionContext<'_>,
    ) -> f64 {
        let route = context.route();
        let arrival_time = activity_context.prev_end_time
            + context
                .problem
                .transport(
                    activity_context.prev.location_id(),
                    activity_context.new_activity.location_id(),
                    activity_context.prev_end_time,
                    route.vehicle_id(),
                    route.driver_id(),
                )
                .duration;

        activity_context
            .new_activity
            .time_windows()
            .operation_start(arrival_time)
            .map_or(0.0, |start| (start - arrival_time) * self.weight)
    }
}
