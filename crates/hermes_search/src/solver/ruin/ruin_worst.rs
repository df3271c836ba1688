use fxhash::FxHashMap;
use rand::Rng;

use crate::{
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::solution::{route::VehicleRoute, working_solution::WorkingSolution},
};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes the jobs whose removal saves the most travel cost, with some randomness controlled by
/// `RuinParams::ruin_worst_determinism`.
pub struct RuinWorst;

/// Travel cost saved by skipping each job activity of `route`. A shipment sums both of its
/// activities, each measured as if the other stayed in place.
fn compute_savings(problem: &VehicleRoutingProblem, route: &VehicleRoute, savings: &mut FxHashMap<JobIdx, f64>) {
    let vehicle_id = route.vehicle_id();
    let driver_id = route.driver_id();

    for position in 1..=route.len() {
        let prev = route.activity(position - 1);
        let activity = route.activity(position);
        let next = route.activity(position + 1);
        let Some(job_id) = activity.job_id() else {
            continue;
        };

        let to_activity = problem.transport(
            prev.location_id(),
            activity.location_id(),
            prev.end_time(),
            vehicle_id,
            driver_id,
        );
        let from_activity = problem.transport(
            activity.location_id(),
            next.location_id(),
            activity.end_time(),
            vehicle_id,
            driver_id,
        );
        let direct = problem.transport(
            prev.location_id(),
            next.location_id(),
            prev.end_time(),
            vehicle_id,
            driver_id,
        );

        *savings.entry(job_id).or_insert(0.0) += to_activity.cost + from_activity.cost - direct.cost;
    }
}

impl RuinSolution for RuinWorst {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let p = context.params.ruin_worst_determinism;

        let mut removed = Vec::with_capacity(context.num_jobs_to_remove);
        let mut savings = FxHashMap::default();
        let mut candidates: Vec<(JobIdx, f64)> = Vec::with_capacity(context.problem.jobs().len());

        for _ in 0..context.num_jobs_to_remove {
            if solution.is_empty() {
                break;
            }

            savings.clear();
            for (_, route) in solution.non_empty_routes_iter() {
                compute_savings(context.problem, route, &mut savings);
            }

            candidates.clear();
            candidates.extend(savings.iter().map(|(&job_id, &saving)| (job_id, saving)));
            candidates.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

            let y: f64 = context.rng.random_range(0.0..1.0);
            let index = (y.powf(p) * candidates.len() as f64).floor() as usize;

            let Some(&(job_id, _)) = candidates.get(index) else {
                break;
            };

            solution.remove_job(job_id);
            removed.push(job_id);
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        solver::ruin::ruin_params::RuinParams,
        test_utils::{self, MockRng, TestRoute},
    };

    use super::*;

    #[test]
    fn test_removes_most_expensive_detour() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 10),
            test_utils::create_basic_services(vec![1, 2, 9]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1, 2],
            }],
        );

        let mut savings = FxHashMap::default();
        compute_savings(&problem, solution.route(0.into()), &mut savings);
        assert_eq!(savings[&JobIdx::new(0)], 0.0);
        assert_eq!(savings[&JobIdx::new(1)], 0.0);
        assert_eq!(savings[&JobIdx::new(2)], 14.0);

        let removed = RuinWorst.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                rng: &mut MockRng::new(vec![0]),
                num_jobs_to_remove: 1,
            },
        );

        assert_eq!(removed, vec![JobIdx::new(2)]);
        assert!(solution.check_integrity().is_ok());
    }
}
