use tracing::{debug, instrument};

use crate::{
    problem::job::JobIdx,
    solver::{
        insertion::{InsertionData, cache::InsertionCache},
        solution::working_solution::WorkingSolution,
    },
};

use super::{recreate_context::RecreateContext, recreate_solution::RecreateSolution};

/// Global best insertion: every step inserts the single cheapest (job, route, position) over all
/// pending jobs, until no pending job fits anywhere.
///
/// Jobs are scanned in ascending order and routes in index order, a candidate only replaces the
/// current best when strictly cheaper, so ties go to the first registered job.
#[derive(Default)]
pub struct BestInsertion;

impl RecreateSolution for BestInsertion {
    #[instrument(skip_all, level = "debug", fields(jobs = jobs.len()))]
    fn recreate_solution(
        &self,
        solution: &mut WorkingSolution,
        jobs: &[JobIdx],
        context: RecreateContext,
    ) -> Vec<JobIdx> {
        let mut pending: Vec<JobIdx> = jobs.to_vec();
        pending.sort_unstable();
        pending.dedup();

        solution.begin_insertion(&pending);
        let mut cache = InsertionCache::default();

        while !pending.is_empty() {
            let routes = solution.candidate_routes();
            let mut best: Option<(usize, InsertionData)> = None;

            for (index, &job_id) in pending.iter().enumerate() {
                for &route_id in &routes {
                    if let Some(data) =
                        cache.get_or_compute(solution, context.constraints, route_id, job_id)
                        && data.is_better_than(best.as_ref().map(|(_, best)| best))
                    {
                        best = Some((index, data));
                    }
                }
            }

            let Some((index, data)) = best else {
                break;
            };

            solution.insert(&data.insertion);
            pending.remove(index);
        }

        if !pending.is_empty() {
            debug!(unassigned = pending.len(), "Best insertion left jobs unassigned");
        }

        pending
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{
        problem::{capacity::Capacity, job::JobIdx},
        solver::{
            constraints::ConstraintManager,
            recreate::{recreate_context::RecreateContext, recreate_params::RecreateParams},
            solution::{route_id::RouteIdx, working_solution::WorkingSolution},
            state::{StateManager, keys::ROUTE_COSTS},
        },
        test_utils::TestProblem,
    };

    use super::*;

    fn recreate_all(problem: TestProblem) -> (WorkingSolution, Vec<JobIdx>) {
        let problem = Arc::new(problem.build());
        let mut solution =
            WorkingSolution::new(problem, Arc::new(StateManager::with_core_updaters()));
        let jobs: Vec<JobIdx> = solution.unassigned_jobs().collect();

        let constraints = ConstraintManager::with_core_constraints();
        let params = RecreateParams::default();
        let mut rng = SmallRng::seed_from_u64(0);

        let unassigned = BestInsertion.recreate_solution(
            &mut solution,
            &jobs,
            RecreateContext {
                rng: &mut rng,
                constraints: &constraints,
                params: &params,
            },
        );

        (solution, unassigned)
    }

    #[test]
    fn test_cheapest_job_is_inserted_first() {
        let mut problem = TestProblem::grid(1, 10);
        problem.add_service(3, |_| {});
        problem.add_service(1, |_| {});
        problem.add_service(5, |_| {});

        let (solution, unassigned) = recreate_all(problem);

        assert!(unassigned.is_empty());
        assert!(solution.check_integrity().is_ok());

        // Inserting before or after an activity on a line costs the same, the earliest
        // position wins.
        assert_eq!(
            solution.route(RouteIdx::new(0)).job_ids().collect::<Vec<_>>(),
            vec![JobIdx::new(2), JobIdx::new(0), JobIdx::new(1)]
        );
        assert_eq!(solution.route_state(RouteIdx::new(0), ROUTE_COSTS), 10.0);
    }

    #[test]
    fn test_job_exceeding_remaining_capacity_stays_unassigned() {
        let mut problem = TestProblem::grid(1, 10);
        problem.capacity = Some(Capacity::from_vec(vec![2.0]));
        for location in [3, 1, 5] {
            problem.add_service(location, |service| {
                service.set_demand(Capacity::from_vec(vec![1.0]));
            });
        }

        let (solution, unassigned) = recreate_all(problem);

        assert_eq!(unassigned, vec![JobIdx::new(2)]);
        assert_eq!(solution.unassigned_jobs_count(), 1);
        assert!(solution.check_integrity().is_ok());
    }

    #[test]
    fn test_equal_costs_go_to_first_job() {
        let mut problem = TestProblem::grid(1, 5);
        problem.vehicle_locations = vec![2];
        problem.capacity = Some(Capacity::from_vec(vec![1.0]));
        for location in [3, 1] {
            problem.add_service(location, |service| {
                service.set_demand(Capacity::from_vec(vec![1.0]));
            });
        }

        let (solution, unassigned) = recreate_all(problem);

        assert_eq!(unassigned, vec![JobIdx::new(1)]);
        assert_eq!(
            solution.route(RouteIdx::new(0)).job_ids().collect::<Vec<_>>(),
            vec![JobIdx::new(0)]
        );
    }
}
