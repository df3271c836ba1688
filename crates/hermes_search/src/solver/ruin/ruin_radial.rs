use rand::{Rng, seq::IndexedRandom};

use crate::{problem::job::JobIdx, solver::solution::working_solution::WorkingSolution};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes a random assigned job and its nearest assigned neighbors.
pub struct RuinRadial;

impl RuinSolution for RuinRadial {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            rng,
            num_jobs_to_remove,
            problem,
            ..
        }: RuinContext<R>,
    ) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let assigned: Vec<JobIdx> = (0..problem.jobs().len())
            .map(JobIdx::new)
            .filter(|&job_id| solution.is_assigned(job_id))
            .collect();

        let Some(&seed_job) = assigned.choose(rng) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(num_jobs_to_remove);
        for job_id in std::iter::once(seed_job).chain(problem.nearest_jobs(seed_job)) {
            if removed.len() >= num_jobs_to_remove {
                break;
            }

            if solution.remove_job(job_id) {
                removed.push(job_id);
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        solver::{ruin::ruin_params::RuinParams, solution::route_id::RouteIdx},
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_radial_ruin_basic() {
        let locations = test_utils::create_location_grid(4, 4);

        //
        //  Y-axis
        //  ^
        //  | (12) (13) (14) (15)
        //  | ( 8) ( 9) (10) (11)
        //  | ( 4) ( 5) ( 6) ( 7)
        //  | ( 0) ( 1) ( 2) ( 3)
        //  +--------------------> X-axis
        let services = test_utils::create_basic_services(vec![1, 6, 8, 10]);
        let vehicles = test_utils::create_basic_vehicles(vec![0]);
        let problem = Arc::new(test_utils::create_test_problem(
            locations, services, vehicles,
        ));

        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1, 2, 3],
            }],
        );

        // Always draws the first assigned job as seed.
        let mut rng = test_utils::MockRng::new(vec![0]);

        let removed = RuinRadial.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                rng: &mut rng,
                num_jobs_to_remove: 2,
            },
        );

        assert_eq!(removed, vec![JobIdx::new(0), JobIdx::new(1)]);
        assert_eq!(
            solution.route(RouteIdx::new(0)).job_ids().collect::<Vec<_>>(),
            vec![JobIdx::new(2), JobIdx::new(3)]
        );
    }
}
