use rand::{Rng, seq::SliceRandom};

use crate::{problem::job::JobIdx, solver::solution::working_solution::WorkingSolution};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes assigned jobs picked uniformly at random.
pub struct RuinRandom;

impl RuinSolution for RuinRandom {
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
        let mut assigned: Vec<JobIdx> = (0..problem.jobs().len())
            .map(JobIdx::new)
            .filter(|&job_id| solution.is_assigned(job_id))
            .collect();

        let amount = num_jobs_to_remove.min(assigned.len());
        let (selected, _) = assigned.partial_shuffle(rng, amount);

        let removed = selected.to_vec();
        for &job_id in &removed {
            solution.remove_job(job_id);
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{
        solver::ruin::ruin_params::RuinParams,
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_removes_requested_number_of_jobs() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(4, 4),
            test_utils::create_basic_services(vec![1, 6, 8, 10, 12]),
            test_utils::create_basic_vehicles(vec![0, 0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![
                TestRoute {
                    vehicle_id: 0,
                    job_ids: vec![0, 1, 2],
                },
                TestRoute {
                    vehicle_id: 1,
                    job_ids: vec![3],
                },
            ],
        );

        let removed = RuinRandom.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                rng: &mut SmallRng::seed_from_u64(11),
                num_jobs_to_remove: 3,
            },
        );

        assert_eq!(removed.len(), 3);
        assert!(removed.iter().all(|&job_id| job_id != JobIdx::new(4)));
        assert_eq!(solution.unassigned_jobs_count(), 4);
        assert!(solution.check_integrity().is_ok());
    }

    #[test]
    fn test_never_removes_more_than_assigned() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            test_utils::create_basic_services(vec![1, 2, 3]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![2],
            }],
        );

        let removed = RuinRandom.ruin_solution(
            &mut solution,
            RuinContext {
                params: &RuinParams::default(),
                problem: &problem,
                rng: &mut SmallRng::seed_from_u64(0),
                num_jobs_to_remove: 10,
            },
        );

        assert_eq!(removed, vec![JobIdx::new(2)]);
        assert!(solution.is_empty());
    }
}
