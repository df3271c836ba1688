use crate::solver::state::{
    keys::{COSTS, ROUTE_COSTS, ROUTE_DISTANCE},
    state_updater::{RouteStateContext, StateEvent, StateEvents, StateUpdater},
};

/// Forward pass accumulating transport and activity costs. Needs the activity times.
pub struct UpdateVariableCosts;

impl StateUpdater for UpdateVariableCosts {
    fn name(&self) -> &str {
        "variable_costs"
    }

    fn interests(&self) -> StateEvents {
        StateEvents::SEQUENCE_CHANGES
    }

    fn update(&self, context: &mut RouteStateContext<'_>, _event: StateEvent<'_>) {
        let mut costs = 0.0;
        let mut distance = 0.0;
        context.put_activity_state(COSTS, 0, costs);

        for position in 1..context.route().activities().len() {
            let departure_time = context.route().activity(position - 1).end_time();
            let transport = context.transport(position - 1, position, departure_time);
            let activity = context.route().activity(position);
            let activity_cost = context.activity_cost(activity, activity.arrival_time());

            costs += transport.cost + activity_cost;
            distance += transport.distance;
            context.put_activity_state(COSTS, position, costs);
        }

        context.put_route_state(ROUTE_COSTS, costs);
        context.put_route_state(ROUTE_DISTANCE, distance);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        solver::{
            solution::route_id::RouteIdx,
            state::keys::{COSTS, ROUTE_COSTS, ROUTE_DISTANCE},
        },
        test_utils::{self, TestRoute},
    };

    #[test]
    fn test_costs_accumulate_along_route() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 10),
            test_utils::create_basic_services(vec![3, 5]),
            test_utils::create_basic_vehicles(vec![0]),
        ));

        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1],
            }],
        );
        let route_id = RouteIdx::new(0);

        assert_eq!(solution.activity_state(route_id, 1, COSTS), 3.0);
        assert_eq!(solution.activity_state(route_id, 2, COSTS), 5.0);
        assert_eq!(solution.route_state(route_id, ROUTE_COSTS), 10.0);
        assert_eq!(solution.route_state(route_id, ROUTE_DISTANCE), 10.0);
    }
}
