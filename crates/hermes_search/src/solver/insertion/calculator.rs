use crate::{
    problem::{
        job::{ActivityId, Job, JobIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        constraints::{ConstraintManager, ConstraintStatus},
        solution::{
            activity::TourActivity,
            route::VehicleRoute,
            route_id::RouteIdx,
            utils::{compute_activity_schedule, compute_departure_time},
            working_solution::WorkingSolution,
        },
        state::keys::{LATEST_OPERATION_START, ROUTE_COSTS},
    },
};

use super::{
    Insertion, InsertionData, ServiceInsertion, ShipmentInsertion,
    context::{ActivityInsertionContext, JobInsertionContext},
};

/// Cheapest feasible insertion of `job_id` in `route_id`, `None` if there is none.
///
/// Positions are scanned in route order and only a strictly cheaper position replaces the
/// current best, so ties keep the earliest position.
pub fn calculate_insertion(
    solution: &WorkingSolution,
    constraints: &ConstraintManager,
    route_id: RouteIdx,
    job_id: JobIdx,
) -> Option<InsertionData> {
    let context = JobInsertionContext::new(solution, route_id, job_id);
    if !constraints.fulfilled_route(&context) {
        return None;
    }

    let route = context.route();
    let mut base_cost = constraints.soft_route_cost(&context);
    if route.is_empty() {
        // Once used, the route pays its own start to end costs and the fixed cost.
        base_cost += solution.route_state(route_id, ROUTE_COSTS) + context.vehicle_type().fixed_cost();
    }

    match context.job() {
        Job::Service(_) => calculate_service_insertion(&context, constraints, base_cost),
        Job::Shipment(_) => calculate_shipment_insertion(&context, constraints, base_cost),
    }
}

fn calculate_service_insertion(
    context: &JobInsertionContext<'_>,
    constraints: &ConstraintManager,
    base_cost: f64,
) -> Option<InsertionData> {
    let route = context.route();
    let new_activity = TourActivity::for_job(context.problem, ActivityId::Service(context.job_id));
    let mut best: Option<InsertionData> = None;

    for position in 0..=route.len() {
        let prev = route.activity(position);
        let activity_context = ActivityInsertionContext {
            prev,
            new_activity: &new_activity,
            next: route.activity(position + 1),
            prev_position: position,
            prev_end_time: prev_end_time(context.problem, route, position, &new_activity),
        };

        match constraints.fulfilled_activity(context, &activity_context) {
            ConstraintStatus::Fulfilled => {}
            ConstraintStatus::NotFulfilled => continue,
            ConstraintStatus::NotFulfilledBreak => break,
        }

        let cost = base_cost
            + marginal_cost(context.problem, route, &activity_context)
            + constraints.soft_activity_cost(context, &activity_context);

        let candidate = InsertionData {
            insertion: Insertion::Service(ServiceInsertion {
                route_id: context.route_id,
                job_index: context.job_id,
                position,
            }),
            cost,
        };

        if candidate.is_better_than(best.as_ref()) {
            best = Some(candidate);
        }
    }

    best
}

fn calculate_shipment_insertion(
    context: &JobInsertionContext<'_>,
    constraints: &ConstraintManager,
    base_cost: f64,
) -> Option<InsertionData> {
    let problem = context.problem;
    let route = context.route();
    let pickup = TourActivity::for_job(problem, ActivityId::ShipmentPickup(context.job_id));
    let delivery = TourActivity::for_job(problem, ActivityId::ShipmentDelivery(context.job_id));
    let mut best: Option<InsertionData> = None;

    for pickup_position in 0..=route.len() {
        let prev = route.activity(pickup_position);
        let pickup_context = ActivityInsertionContext {
            prev,
            new_activity: &pickup,
            next: route.activity(pickup_position + 1),
            prev_position: pickup_position,
            prev_end_time: prev_end_time(problem, route, pickup_position, &pickup),
        };

        match constraints.fulfilled_activity(context, &pickup_context) {
            ConstraintStatus::Fulfilled => {}
            ConstraintStatus::NotFulfilled => continue,
            ConstraintStatus::NotFulfilledBreak => break,
        }

        let pickup_cost = marginal_cost(problem, route, &pickup_context)
            + constraints.soft_activity_cost(context, &pickup_context);

        let pickup_arrival = pickup_context.prev_end_time
            + travel_time(problem, route, prev, &pickup, pickup_context.prev_end_time);
        let (_, pickup_end) = compute_activity_schedule(&pickup, pickup_arrival);

        // Activities between the pickup and the delivery are shifted by the pickup.
        let mut delivery_prev = &pickup;
        let mut delivery_prev_end = pickup_end;

        for delivery_position in pickup_position..=route.len() {
            if delivery_position > pickup_position {
                let shifted = route.activity(delivery_position);
                let arrival = delivery_prev_end
                    + travel_time(problem, route, delivery_prev, shifted, delivery_prev_end);
                let latest_start = context.solution.activity_state(
                    context.route_id,
                    delivery_position,
                    LATEST_OPERATION_START,
                );
                if arrival > latest_start {
                    break;
                }

                let (_, end) = compute_activity_schedule(shifted, arrival);
                delivery_prev = shifted;
                delivery_prev_end = end;
            }

            let delivery_context = ActivityInsertionContext {
                prev: delivery_prev,
                new_activity: &delivery,
                next: route.activity(delivery_position + 1),
                prev_position: delivery_position,
                prev_end_time: delivery_prev_end,
            };

            match constraints.fulfilled_activity(context, &delivery_context) {
                ConstraintStatus::Fulfilled => {}
                ConstraintStatus::NotFulfilled => continue,
                ConstraintStatus::NotFulfilledBreak => break,
            }

            let cost = base_cost
                + pickup_cost
                + marginal_cost(problem, route, &delivery_context)
                + constraints.soft_activity_cost(context, &delivery_context);

            let candidate = InsertionData {
                insertion: Insertion::Shipment(ShipmentInsertion {
                    route_id: context.route_id,
                    job_index: context.job_id,
                    pickup_position,
                    delivery_position,
                }),
                cost,
            };

            if candidate.is_better_than(best.as_ref()) {
                best = Some(candidate);
            }
        }
    }

    best
}

/// When the vehicle leaves the activity before `position` once `new_activity` follows it. Only
/// the start moves, for vehicles with a variable departure.
fn prev_end_time(
    problem: &VehicleRoutingProblem,
    route: &VehicleRoute,
    position: usize,
    new_activity: &TourActivity,
) -> f64 {
    if position == 0 {
        compute_departure_time(
            problem,
            route.vehicle_id(),
            route.driver_id(),
            route.start(),
            Some(new_activity),
        )
    } else {
        route.activity(position).end_time()
    }
}

#[inline]
fn travel_time(
    problem: &VehicleRoutingProblem,
    route: &VehicleRoute,
    from: &TourActivity,
    to: &TourActivity,
    departure_time: f64,
) -> f64 {
    problem
        .transport(
            from.location_id(),
            to.location_id(),
            departure_time,
            route.vehicle_id(),
            route.driver_id(),
        )
        .duration
}

/// Cost of `prev -> new -> next` minus the cost of `prev -> next`, both including the
/// activity costs of what is reached. The direct leg is priced on the current schedule of the
/// route.
pub(crate) fn marginal_cost(
    problem: &VehicleRoutingProblem,
    route: &VehicleRoute,
    activity_context: &ActivityInsertionContext<'_>,
) -> f64 {
    let ActivityInsertionContext {
        prev,
        new_activity,
        next,
        prev_end_time,
        ..
    } = *activity_context;
    let vehicle_id = route.vehicle_id();
    let driver_id = route.driver_id();

    let to_new = problem.transport(
        prev.location_id(),
        new_activity.location_id(),
        prev_end_time,
        vehicle_id,
        driver_id,
    );
    let new_arrival = prev_end_time + to_new.duration;
    let (_, new_end) = compute_activity_schedule(new_activity, new_arrival);
    let to_next = problem.transport(
        new_activity.location_id(),
        next.location_id(),
        new_end,
        vehicle_id,
        driver_id,
    );
    let next_arrival = new_end + to_next.duration;

    let with_new = to_new.cost
        + problem.activity_cost(new_activity, new_arrival, vehicle_id, driver_id)
        + to_next.cost
        + problem.activity_cost(next, next_arrival, vehicle_id, driver_id);

    // A variable departure moves with the first activity, the route without the new activity
    // keeps its own departure.
    let departure_without_new = if prev.is_start() {
        prev.end_time()
    } else {
        prev_end_time
    };
    let direct = problem.transport(
        prev.location_id(),
        next.location_id(),
        departure_without_new,
        vehicle_id,
        driver_id,
    );
    let without_new = direct.cost
        + problem.activity_cost(
            next,
            departure_without_new + direct.duration,
            vehicle_id,
            driver_id,
        );

    with_new - without_new
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::{job::JobIdx, skill::Skill, time_window::TimeWindow},
        solver::{
            constraints::ConstraintManager,
            insertion::{Insertion, ServiceInsertion, ShipmentInsertion},
            solution::route_id::RouteIdx,
        },
        test_utils::{self, TestProblem, TestRoute},
    };

    use super::*;

    #[test]
    fn test_service_insertion_picks_cheapest_position() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 10),
            test_utils::create_basic_services(vec![2, 6, 4]),
            test_utils::create_basic_vehicles(vec![0]),
        ));

        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1],
            }],
        );

        let data = calculate_insertion(
            &solution,
            &ConstraintManager::with_core_constraints(),
            RouteIdx::new(0),
            JobIdx::new(2),
        )
        .unwrap();

        // Between the two stops and on the way back are both free, the first one wins.
        assert_eq!(
            data.insertion,
            Insertion::Service(ServiceInsertion {
                route_id: RouteIdx::new(0),
                job_index: JobIdx::new(2),
                position: 1,
            })
        );
        assert_eq!(data.cost, 0.0);
    }

    #[test]
    fn test_empty_route_includes_fixed_cost() {
        let mut problem = TestProblem::grid(1, 10);
        problem.fixed_cost = 50.0;
        problem.add_service(3, |_| {});
        let problem = Arc::new(problem.build());

        let solution = test_utils::create_test_working_solution(Arc::clone(&problem), vec![]);
        let data = calculate_insertion(
            &solution,
            &ConstraintManager::with_core_constraints(),
            RouteIdx::new(0),
            JobIdx::new(0),
        )
        .unwrap();

        assert_eq!(data.cost, 56.0);
    }

    #[test]
    fn test_shipment_insertion() {
        let mut problem = TestProblem::grid(1, 10);
        problem.add_service(5, |_| {});
        problem.add_shipment(7, 2, |_| {});
        let problem = Arc::new(problem.build());

        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0],
            }],
        );

        let data = calculate_insertion(
            &solution,
            &ConstraintManager::with_core_constraints(),
            RouteIdx::new(0),
            JobIdx::new(1),
        )
        .unwrap();

        // 0 -> 7 -> 5 -> 2 -> 0 and 0 -> 5 -> 7 -> 2 -> 0 both cost 4 more than 0 -> 5 -> 0.
        assert_eq!(
            data.insertion,
            Insertion::Shipment(ShipmentInsertion {
                route_id: RouteIdx::new(0),
                job_index: JobIdx::new(1),
                pickup_position: 0,
                delivery_position: 1,
            })
        );
        assert_eq!(data.cost, 4.0);
    }

    /// Inserts `job_id` at every position of route 0 and returns the real cost increase of the
    /// feasible ones, recomputed by the state updaters.
    fn real_insertion_costs(solution: &WorkingSolution, job_id: JobIdx) -> Vec<(usize, f64)> {
        let route_id = RouteIdx::new(0);
        let before = solution.route_state(route_id, ROUTE_COSTS);

        (0..=solution.route(route_id).len())
            .filter_map(|position| {
                let mut inserted = solution.clone();
                inserted.insert(&Insertion::Service(ServiceInsertion {
                    route_id,
                    job_index: job_id,
                    position,
                }));

                let route = inserted.route(route_id);
                let feasible = route.job_activities().iter().all(|activity| {
                    activity
                        .time_windows()
                        .operation_start(activity.arrival_time())
                        .is_some()
                }) && route.end().arrival_time() <= route.vehicle(inserted.problem()).latest_end();

                feasible.then(|| (position, inserted.route_state(route_id, ROUTE_COSTS) - before))
            })
            .collect()
    }

    fn assert_cheapest_real_position(solution: &WorkingSolution, job_id: JobIdx) -> usize {
        let data = calculate_insertion(
            solution,
            &ConstraintManager::with_core_constraints(),
            RouteIdx::new(0),
            job_id,
        )
        .unwrap();
        let Insertion::Service(ServiceInsertion { position, .. }) = data.insertion else {
            panic!("expected a service insertion");
        };

        let real_costs = real_insertion_costs(solution, job_id);
        let cheapest = real_costs
            .iter()
            .map(|&(_, cost)| cost)
            .fold(f64::INFINITY, f64::min);
        let (_, chosen) = real_costs
            .iter()
            .find(|&&(real_position, _)| real_position == position)
            .copied()
            .unwrap();

        assert!((chosen - cheapest).abs() < 1e-9, "{real_costs:?}, chose {position}");
        assert!((data.cost - chosen).abs() < 1e-9, "predicted {} real {chosen}", data.cost);

        position
    }

    #[test]
    fn test_variable_departure_prices_waiting_at_former_first_stop() {
        let mut problem = TestProblem::grid(1, 20);
        problem.variable_departure = true;
        problem.cost_per_waiting_time = 1.0;
        problem.add_service(10, |service| {
            service.add_time_window(TimeWindow::new(100.0, 200.0));
        });
        problem.add_service(5, |_| {});
        let problem = Arc::new(problem.build());

        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0],
            }],
        );
        assert_eq!(solution.route(RouteIdx::new(0)).departure_time(), 90.0);

        // Going first would make the vehicle leave at 0 and wait 90 at the windowed stop.
        assert_eq!(assert_cheapest_real_position(&solution, JobIdx::new(1)), 1);
    }

    #[test]
    fn test_chosen_position_has_lowest_real_cost() {
        for variable_departure in [false, true] {
            let mut problem = TestProblem::grid(1, 20);
            problem.variable_departure = variable_departure;
            problem.cost_per_waiting_time = 1.0;
            problem.add_service(4, |service| {
                service.add_time_window(TimeWindow::new(20.0, 30.0));
            });
            problem.add_service(12, |service| {
                service.add_time_window(TimeWindow::new(40.0, 60.0));
            });
            problem.add_service(8, |service| {
                service.add_time_window(TimeWindow::new(0.0, 100.0));
            });
            let problem = Arc::new(problem.build());

            let solution = test_utils::create_test_working_solution(
                Arc::clone(&problem),
                vec![TestRoute {
                    vehicle_id: 0,
                    job_ids: vec![0, 1],
                }],
            );

            assert_cheapest_real_position(&solution, JobIdx::new(2));
        }
    }

    #[test]
    fn test_incompatible_route_has_no_insertion() {
        let mut problem = TestProblem::grid(1, 10);
        problem.vehicle_locations = vec![0, 0];
        problem.vehicle_skills = vec![vec![], vec![String::from("fridge")]];
        problem.add_service(3, |service| {
            service.add_skill(Skill::new("fridge"));
        });
        let problem = Arc::new(problem.build());

        let solution = test_utils::create_test_working_solution(Arc::clone(&problem), vec![]);
        let constraints = ConstraintManager::with_core_constraints();

        assert!(calculate_insertion(&solution, &constraints, RouteIdx::new(0), JobIdx::new(0)).is_none());
        assert!(calculate_insertion(&solution, &constraints, RouteIdx::new(1), JobIdx::new(0)).is_some());
    }
}
