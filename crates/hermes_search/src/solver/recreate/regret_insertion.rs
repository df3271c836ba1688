use tracing::{debug, instrument};

use crate::{
    problem::job::JobIdx,
    solver::{
        constraints::ConstraintManager,
        insertion::{InsertionData, cache::InsertionCache},
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

use super::{recreate_context::RecreateContext, recreate_solution::RecreateSolution};

/// Regret-k insertion.
///
/// Instead of the overall cheapest insertion, each step places the job that is hardest to place
/// later. For every pending job the best insertion per route is computed and sorted by cost, the
/// regret is the sum of the cost differences between the `k - 1` next best routes and the best
/// one. A job with fewer than `k` feasible routes counts its unassigned penalty for every missing
/// alternative, so jobs with few options go first.
///
/// The job with the highest regret is inserted at its best position, ties go to the first job.
pub struct RegretInsertion {
    k: usize,
}

impl RegretInsertion {
    /// # Panics
    /// Panics if `k < 2`, the regret needs at least two options to compare.
    pub fn new(k: usize) -> Self {
        assert!(k >= 2, "Regret-k insertion requires k to be at least 2");
        RegretInsertion { k }
    }

    fn compute_regret(
        &self,
        solution: &WorkingSolution,
        constraints: &ConstraintManager,
        cache: &mut InsertionCache,
        routes: &[RouteIdx],
        job_id: JobIdx,
    ) -> Option<(f64, InsertionData)> {
        let mut options: Vec<InsertionData> = routes
            .iter()
            .filter_map(|&route_id| cache.get_or_compute(solution, constraints, route_id, job_id))
            .collect();

        if options.is_empty() {
            return None;
        }

        // Stable, equal costs keep the route order.
        options.sort_by(|a, b| a.cost.total_cmp(&b.cost));

        let best_cost = options[0].cost;
        let missing_penalty = solution.problem().unassigned_job_cost(job_id);
        let regret = (1..self.k)
            .map(|rank| {
                options
                    .get(rank)
                    .map_or(missing_penalty, |option| option.cost - best_cost)
            })
            .sum();

        Some((regret, options.swap_remove(0)))
    }
}

impl RecreateSolution for RegretInsertion {
    #[instrument(skip_all, level = "debug", fields(jobs = jobs.len(), k = self.k))]
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
            let mut selected: Option<(usize, f64, InsertionData)> = None;

            for (index, &job_id) in pending.iter().enumerate() {
                let Some((regret, data)) =
                    self.compute_regret(solution, context.constraints, &mut cache, &routes, job_id)
                else {
                    continue;
                };

                if selected
                    .as_ref()
                    .is_none_or(|(_, max_regret, _)| regret > *max_regret)
                {
                    selected = Some((index, regret, data));
                }
            }

            let Some((index, _, data)) = selected else {
                break;
            };

            solution.insert(&data.insertion);
            pending.remove(index);
        }

        if !pending.is_empty() {
            debug!(unassigned = pending.len(), "Regret insertion left jobs unassigned");
        }

        pending
    }
}
