use crate::{
    problem::job::{ActivityId, JobKind},
    solver::{
        insertion::context::{ActivityInsertionContext, JobInsertionContext},
        state::keys::{FUTURE_MAX_LOAD, LOAD, LOAD_AT_BEGINNING, LOAD_AT_END, PAST_MAX_LOAD},
    },
};

use super::{ConstraintStatus, HardActivityConstraint, HardRouteConstraint};

/// Cheap route level capacity check: the load at the start or the end of the route must still
/// fit once the job is added.
pub struct RouteLoadConstraint;

impl HardRouteConstraint for RouteLoadConstraint {
    fn constraint_name(&self) -> &'static str {
        "route_load"
    }

    fn fulfilled(&self, context: &JobInsertionContext<'_>) -> bool {
        let capacity = context.vehicle_type().capacity();
        let job = context.job();
        let demand = job.demand();

        match job.kind() {
            JobKind::Delivery => {
                let load = context
                    .solution
                    .route_state(context.route_id, LOAD_AT_BEGINNING);
                (&load + demand).fits_in(capacity)
            }
            JobKind::Service | JobKind::Pickup => {
                let load = context.solution.route_state(context.route_id, LOAD_AT_END);
                (&load + demand).fits_in(capacity)
            }
            JobKind::Shipment => demand.fits_in(capacity),
        }
    }
}

/// Capacity check at a given position.
///
/// A delivery service raises the load of every activity before it, a pickup or a plain service
/// raises the load of every activity after it. A shipment raises the load between its pickup
/// and its delivery, which the delivery scan checks one position at a time.
pub struct ActivityLoadConstraint;

impl HardActivityConstraint for ActivityLoadConstraint {
    fn constraint_name(&self) -> &'static str {
        "activity_load"
    }

    fn fulfilled(
        &self,
        context: &JobInsertionContext<'_>,
        activity_context: &ActivityInsertionContext<'_>,
    ) -> ConstraintStatus {
        let Some(activity_id) = activity_context.new_activity.activity_id() else {
            return ConstraintStatus::Fulfilled;
        };

        let capacity = context.vehicle_type().capacity();
        let job = context.job();
        let demand = job.demand();
        let solution = context.solution;
        let position = activity_context.prev_position;

        let (load, failure) = match activity_id {
            ActivityId::ShipmentPickup(_) => (
                solution.activity_state(context.route_id, position, LOAD),
                ConstraintStatus::NotFulfilled,
            ),
            ActivityId::ShipmentDelivery(_) => (
                solution.activity_state(context.route_id, position, LOAD),
                ConstraintStatus::NotFulfilledBreak,
            ),
            ActivityId::Service(_) if job.kind() == JobKind::Delivery => (
                solution.activity_state(context.route_id, position, PAST_MAX_LOAD),
                ConstraintStatus::NotFulfilledBreak,
            ),
            ActivityId::Service(_) => (
                solution.activity_state(context.route_id, position, FUTURE_MAX_LOAD),
                ConstraintStatus::NotFulfilled,
            ),
        };

        if (&load + demand).fits_in(capacity) {
            ConstraintStatus::Fulfilled
        } else {
            failure
        }
    }
}
