use serde::{Deserialize, Serialize};

use crate::{
    problem::{job::ActivityId, travel_cost_matrix::Cost},
    solver::{
        objective::CostBreakdown,
        state::keys::{ROUTE_COSTS, ROUTE_DISTANCE, ROUTE_DURATION, WAITING_TIME},
    },
};

use super::{
    activity::{ActivityKind, TourActivity},
    working_solution::WorkingSolution,
};

/// Read-only view of a solution for printing, plotting or serializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub cost: Cost,
    pub cost_breakdown: CostBreakdown,
    pub routes: Vec<RouteReport>,
    /// External ids of the unassigned jobs.
    pub unassigned_jobs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    pub vehicle_id: String,
    pub departure_time: f64,
    pub arrival_time: f64,
    pub distance: f64,
    pub duration: f64,
    pub waiting_time: f64,
    pub variable_costs: Cost,
    pub fixed_cost: Cost,
    pub activities: Vec<ActivityReport>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityReportKind {
    Start,
    End,
    Service,
    Pickup,
    Delivery,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub kind: ActivityReportKind,
    pub job_id: Option<String>,
    pub location_id: Option<usize>,
    pub arrival_time: f64,
    pub operation_start: f64,
    pub departure_time: f64,
    pub waiting_time: f64,
    pub load: Vec<f64>,
}

impl SolutionReport {
    pub fn new(solution: &WorkingSolution, cost_breakdown: CostBreakdown) -> Self {
        let problem = solution.problem();

        let routes = solution
            .non_empty_routes_iter()
            .map(|(route_id, route)| {
                let vehicle = route.vehicle(problem);
                let activities = route
                    .activities()
                    .iter()
                    .map(|activity| ActivityReport::new(solution, activity))
                    .collect();

                RouteReport {
                    vehicle_id: vehicle.external_id().to_owned(),
                    departure_time: route.start().end_time(),
                    arrival_time: route.end().arrival_time(),
                    distance: solution.route_state(route_id, ROUTE_DISTANCE),
                    duration: solution.route_state(route_id, ROUTE_DURATION),
                    waiting_time: solution.route_state(route_id, WAITING_TIME),
                    variable_costs: solution.route_state(route_id, ROUTE_COSTS),
                    fixed_cost: problem.vehicle_type_of(route.vehicle_id()).fixed_cost(),
                    activities,
                }
            })
            .collect();

        SolutionReport {
            cost: cost_breakdown.total(),
            cost_breakdown,
            routes,
            unassigned_jobs: solution
                .unassigned_jobs()
                .map(|job_id| problem.job(job_id).external_id().to_owned())
                .collect(),
        }
    }
}

impl ActivityReport {
    fn new(solution: &WorkingSolution, activity: &TourActivity) -> Self {
        let kind = match activity.kind() {
            ActivityKind::Start => ActivityReportKind::Start,
            ActivityKind::End => ActivityReportKind::End,
            ActivityKind::Job(ActivityId::Service(_)) => ActivityReportKind::Service,
            ActivityKind::Job(ActivityId::ShipmentPickup(_)) => ActivityReportKind::Pickup,
            ActivityKind::Job(ActivityId::ShipmentDelivery(_)) => ActivityReportKind::Delivery,
        };

        ActivityReport {
            kind,
            job_id: activity
                .job_id()
                .map(|job_id| solution.problem().job(job_id).external_id().to_owned()),
            location_id: activity.location_id().map(|location_id| location_id.get()),
            arrival_time: activity.arrival_time(),
            operation_start: activity.operation_start(),
            departure_time: activity.end_time(),
            waiting_time: activity.waiting_time(),
            load: activity.load().iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::time_window::TimeWindow,
        solver::objective::{DefaultSolutionCostCalculator, SolutionCostCalculator},
        test_utils::{TestProblem, TestRoute, create_test_working_solution},
    };

    use super::*;

    #[test]
    fn test_report_lists_routes_activities_and_unassigned_jobs() {
        let mut problem = TestProblem::grid(1, 10);
        problem.vehicle_locations = vec![0, 0];
        problem.add_service(4, |service| {
            service.add_time_window(TimeWindow::new(6.0, 20.0)).set_duration(1.0);
        });
        problem.add_service(2, |_| {});
        let problem = Arc::new(problem.build());

        let solution = create_test_working_solution(
            problem,
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0],
            }],
        );
        let breakdown = DefaultSolutionCostCalculator::default().breakdown(&solution);

        let report = SolutionReport::new(&solution, breakdown);

        assert_eq!(report.unassigned_jobs, vec!["1".to_owned()]);
        assert_eq!(report.routes.len(), 1);

        let route = &report.routes[0];
        assert_eq!(route.vehicle_id, "0");
        assert_eq!(route.distance, 8.0);
        assert_eq!(route.activities.len(), 3);
        assert_eq!(route.activities[0].kind, ActivityReportKind::Start);
        assert_eq!(route.activities[2].kind, ActivityReportKind::End);

        let service = &route.activities[1];
        assert_eq!(service.kind, ActivityReportKind::Service);
        assert_eq!(service.job_id.as_deref(), Some("0"));
        assert_eq!(service.arrival_time, 4.0);
        assert_eq!(service.operation_start, 6.0);
        assert_eq!(service.waiting_time, 2.0);
        assert_eq!(service.departure_time, 7.0);

        let json = serde_json::to_string(&report).unwrap();
        let parsed: SolutionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
