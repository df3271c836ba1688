use crate::{
    problem::{capacity::Capacity, job::JobKind},
    solver::state::{
        keys::{FUTURE_MAX_LOAD, LOAD, LOAD_AT_BEGINNING, LOAD_AT_END, MAX_LOAD, PAST_MAX_LOAD},
        state_updater::{RouteStateContext, StateEvent, StateEvents, StateUpdater},
    },
};

/// Writes the load after every activity along with the running maxima in both directions.
///
/// Delivery services are loaded at the depot, so the vehicle leaves with the sum of their
/// demands on board.
pub struct UpdateLoads;

impl StateUpdater for UpdateLoads {
    fn name(&self) -> &str {
        "loads"
    }

    fn interests(&self) -> StateEvents {
        StateEvents::SEQUENCE_CHANGES
    }

    fn update(&self, context: &mut RouteStateContext<'_>, _event: StateEvent<'_>) {
        let problem = context.problem();
        let mut load_at_beginning = Capacity::EMPTY;
        for job_id in context.route().job_ids() {
            let job = problem.job(job_id);
            if job.kind() == JobKind::Delivery {
                load_at_beginning += job.demand();
            }
        }

        let activity_count = context.route().activities().len();
        let mut loads = Vec::with_capacity(activity_count);
        let mut current = load_at_beginning.clone();
        for activity in context.route().activities() {
            current += activity.load_change();
            loads.push(current.clone());
        }

        let mut past_max = Capacity::EMPTY;
        for (position, load) in loads.iter().enumerate() {
            past_max = past_max.max(load);
            context.put_activity_state(LOAD, position, load.clone());
            context.put_activity_state(PAST_MAX_LOAD, position, past_max.clone());
            context.set_activity_load(position, load.clone());
        }

        let mut future_max = Capacity::EMPTY;
        for (position, load) in loads.iter().enumerate().rev() {
            future_max = future_max.max(load);
            context.put_activity_state(FUTURE_MAX_LOAD, position, future_max.clone());
        }

        context.put_route_state(LOAD_AT_BEGINNING, load_at_beginning);
        context.put_route_state(LOAD_AT_END, current);
        context.put_route_state(MAX_LOAD, past_max);
    }
}
