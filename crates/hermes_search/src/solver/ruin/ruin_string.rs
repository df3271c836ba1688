//! Slack Induction by String Removals for Vehicle Routing Problems
//! Jan Christiaens, Greet Vanden Berghe

use fxhash::FxHashSet;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    problem::job::JobIdx,
    solver::solution::{route_id::RouteIdx, working_solution::WorkingSolution},
};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes strings of consecutive jobs from routes close to a random seed job.
///
/// Routes are visited in the order of the seed's neighborhood, at most one string per route.
/// A split string keeps a substring in the middle of the removed string in place.
pub struct RuinString;

struct SplitString {
    start: usize,
    start_of_preserved_string: usize,
    string_length: usize,
    preserved_string_length: usize,
}

impl RuinString {
    /// Start positions of every string of `string_length` jobs that contains `index`.
    fn compute_possible_string_start(
        string_length: usize,
        index: usize,
        route_length: usize,
    ) -> Vec<usize> {
        let mut starts = vec![];
        for i in 1..=string_length {
            let lower: i64 = index as i64 - (string_length as i64 - i as i64);
            let upper = index + (i - 1);
            if lower >= 0 && upper < route_length {
                starts.push(lower as usize);
            }
        }

        starts
    }

    fn compute_preserved_length<R>(string_length: usize, route_length: usize, rng: &mut R) -> usize
    where
        R: Rng,
    {
        // Cannot preserve anything in this case
        if string_length >= route_length {
            return 0;
        }

        let mut preserved_length = 1;
        while string_length + preserved_length < route_length {
            if rng.random_bool(0.01) {
                return preserved_length;
            }
            preserved_length += 1;
        }

        preserved_length
    }

    fn select_string<R>(route_jobs: &[JobIdx], index: usize, string_length: usize, rng: &mut R) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let starts = Self::compute_possible_string_start(string_length, index, route_jobs.len());
        match starts.choose(rng) {
            Some(&start) => route_jobs[start..start + string_length].to_vec(),
            None => Vec::new(),
        }
    }

    fn select_split_string<R>(
        route_jobs: &[JobIdx],
        index: usize,
        string_length: usize,
        rng: &mut R,
    ) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let preserved_string_length =
            Self::compute_preserved_length(string_length, route_jobs.len(), rng);
        if preserved_string_length == 0 {
            return Self::select_string(route_jobs, index, string_length, rng);
        }

        let total_string_length = string_length + preserved_string_length;
        let starts = Self::compute_possible_string_start(total_string_length, index, route_jobs.len());
        let Some(&start) = starts.choose(rng) else {
            return Self::select_string(route_jobs, index, string_length, rng);
        };

        Self::split_string(
            route_jobs,
            SplitString {
                start,
                start_of_preserved_string: rng.random_range(0..string_length),
                string_length,
                preserved_string_length,
            },
        )
    }

    fn split_string(
        route_jobs: &[JobIdx],
        SplitString {
            start,
            start_of_preserved_string,
            string_length,
            preserved_string_length,
        }: SplitString,
    ) -> Vec<JobIdx> {
        let preserved = start_of_preserved_string..start_of_preserved_string + preserved_string_length;

        (0..string_length + preserved_string_length)
            .filter(|offset| !preserved.contains(offset))
            .map(|offset| route_jobs[start + offset])
            .collect()
    }
}

impl RuinSolution for RuinString {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let RuinContext {
            params,
            problem,
            rng,
            num_jobs_to_remove,
        } = context;

        let non_empty_routes = solution.non_empty_routes_count();
        if non_empty_routes == 0 || num_jobs_to_remove == 0 {
            return Vec::new();
        }

        // Strings are capped by the average route length.
        let average_route_length = solution.assigned_jobs_count().div_ceil(non_empty_routes);
        let maximum_length = params
            .string_maximum_length
            .min(average_route_length)
            .max(1);
        let strings = rng
            .random_range(1..=params.string_maximum_strings.max(1))
            .min(non_empty_routes);

        let assigned: Vec<JobIdx> = (0..problem.jobs().len())
            .map(JobIdx::new)
            .filter(|&job_id| solution.is_assigned(job_id))
            .collect();
        let Some(&seed_job) = assigned.choose(rng) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(num_jobs_to_remove);
        let mut ruined_routes = FxHashSet::<RouteIdx>::default();

        for job_id in std::iter::once(seed_job).chain(problem.nearest_jobs(seed_job)) {
            if ruined_routes.len() >= strings || removed.len() >= num_jobs_to_remove {
                break;
            }

            let Some(route_id) = solution.route_of_job(job_id) else {
                continue;
            };
            if !ruined_routes.insert(route_id) {
                continue;
            }

            let route_jobs: Vec<JobIdx> = solution.route(route_id).job_ids().collect();
            let Some(index) = route_jobs.iter().position(|&other| other == job_id) else {
                continue;
            };

            let string_length = rng.random_range(1..=maximum_length.min(route_jobs.len()));
            let mut selected = if rng.random_bool(params.string_split_probability) {
                Self::select_split_string(&route_jobs, index, string_length, rng)
            } else {
                Self::select_string(&route_jobs, index, string_length, rng)
            };
            selected.truncate(num_jobs_to_remove - removed.len());

            for job_id in selected {
                if solution.remove_job(job_id) {
                    removed.push(job_id);
                }
            }
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

    fn job_ids(ids: &[usize]) -> Vec<JobIdx> {
        ids.iter().map(|&id| JobIdx::new(id)).collect()
    }

    #[test]
    fn test_compute_possible_string_start() {
        assert_eq!(
            RuinString::compute_possible_string_start(3, 1, 5),
            vec![0, 1]
        );
        assert_eq!(
            RuinString::compute_possible_string_start(2, 4, 5),
            vec![3]
        );
        assert_eq!(
            RuinString::compute_possible_string_start(1, 2, 5),
            vec![2]
        );
    }

    #[test]
    fn test_split_string_keeps_preserved_jobs() {
        let route_jobs = job_ids(&[0, 1, 2, 3, 4, 5]);

        let selected = RuinString::split_string(
            &route_jobs,
            SplitString {
                start: 1,
                start_of_preserved_string: 1,
                string_length: 3,
                preserved_string_length: 2,
            },
        );

        assert_eq!(selected, job_ids(&[1, 4, 5]));
    }

    #[test]
    fn test_preserved_length_leaves_room_for_string() {
        let mut rng = SmallRng::seed_from_u64(5);

        assert_eq!(RuinString::compute_preserved_length(4, 4, &mut rng), 0);
        for _ in 0..20 {
            let preserved = RuinString::compute_preserved_length(3, 8, &mut rng);
            assert!((1..=5).contains(&preserved));
        }
    }

    #[test]
    fn test_ruin_string_respects_removal_count() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(4, 4),
            test_utils::create_basic_services((1..13).collect()),
            test_utils::create_basic_vehicles(vec![0, 0, 0]),
        ));

        for seed in 0..10 {
            let mut solution = test_utils::create_test_working_solution(
                Arc::clone(&problem),
                vec![
                    TestRoute {
                        vehicle_id: 0,
                        job_ids: vec![0, 1, 2, 3],
                    },
                    TestRoute {
                        vehicle_id: 1,
                        job_ids: vec![4, 5, 6, 7],
                    },
                    TestRoute {
                        vehicle_id: 2,
                        job_ids: vec![8, 9, 10, 11],
                    },
                ],
            );

            let removed = RuinString.ruin_solution(
                &mut solution,
                RuinContext {
                    params: &RuinParams::default(),
                    problem: &problem,
                    rng: &mut SmallRng::seed_from_u64(seed),
                    num_jobs_to_remove: 5,
                },
            );

            assert!(!removed.is_empty());
            assert!(removed.len() <= 5);
            assert_eq!(solution.unassigned_jobs_count(), removed.len());
            assert!(solution.check_integrity().is_ok());
        }
    }
}
