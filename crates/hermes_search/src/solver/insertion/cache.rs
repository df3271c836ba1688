use fxhash::FxHashMap;

use crate::{
    problem::job::JobIdx,
    solver::{
        constraints::ConstraintManager,
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

use super::{InsertionData, calculator::calculate_insertion};

struct CachedInsertion {
    route_version: usize,
    data: Option<InsertionData>,
}

/// Best insertion per (route, job), valid as long as the route version does not change.
///
/// Versions only increase while jobs are being inserted, but a rollback restores older
/// versions, so a cache must not outlive one recreate call.
#[derive(Default)]
pub struct InsertionCache {
    entries: FxHashMap<(RouteIdx, JobIdx), CachedInsertion>,
}

impl InsertionCache {
    pub fn get_or_compute(
        &mut self,
        solution: &WorkingSolution,
        constraints: &ConstraintManager,
        route_id: RouteIdx,
        job_id: JobIdx,
    ) -> Option<InsertionData> {
        let route_version = solution.route(route_id).version();

        if let Some(cached) = self.entries.get(&(route_id, job_id))
            && cached.route_version == route_version
        {
            return cached.data.clone();
        }

        let data = calculate_insertion(solution, constraints, route_id, job_id);
        self.entries.insert(
            (route_id, job_id),
            CachedInsertion {
                route_version,
                data: data.clone(),
            },
        );

        data
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
