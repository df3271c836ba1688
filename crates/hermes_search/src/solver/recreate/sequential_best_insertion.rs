use std::{fmt::Display, str::FromStr};

use rand::{Rng, rngs::SmallRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    error::ConfigurationError,
    problem::{
        job::JobIdx, vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        insertion::{InsertionData, calculator::calculate_insertion},
        solution::working_solution::WorkingSolution,
    },
};

use super::{recreate_context::RecreateContext, recreate_solution::RecreateSolution};

/// Inserts jobs one after the other in a given order, each at its cheapest position at the time.
///
/// With a positive blink rate, every route is skipped with that probability while looking for
/// the position of a job, which makes repeated runs explore different solutions.
pub struct SequentialBestInsertion {
    sort_strategy: BestInsertionSortStrategy,
    blink_rate: f64,
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestInsertionSortStrategy {
    #[default]
    Random,
    /// Largest demand first.
    Demand,
    /// Farthest from the vehicle starts first.
    Far,
    Close,
    /// Earliest closing time window first.
    TimeWindow,
}

impl Display for BestInsertionSortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Demand => write!(f, "demand"),
            Self::Far => write!(f, "far"),
            Self::Close => write!(f, "close"),
            Self::TimeWindow => write!(f, "time_window"),
        }
    }
}

impl FromStr for BestInsertionSortStrategy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "demand" => Ok(Self::Demand),
            "far" => Ok(Self::Far),
            "close" => Ok(Self::Close),
            "time_window" => Ok(Self::TimeWindow),
            _ => Err(ConfigurationError::UnknownStrategy {
                kind: "insertion sort",
                name: s.to_owned(),
            }),
        }
    }
}

pub struct BestInsertionParams {
    pub sort_strategy: BestInsertionSortStrategy,
    pub blink_rate: f64,
}

impl SequentialBestInsertion {
    pub fn new(
        BestInsertionParams {
            sort_strategy,
            blink_rate,
        }: BestInsertionParams,
    ) -> Self {
        SequentialBestInsertion {
            sort_strategy,
            blink_rate,
        }
    }

    /// Orders `jobs` according to the sort strategy. Sorting is stable so equal keys keep the
    /// incoming order.
    pub fn sort_jobs(&self, problem: &VehicleRoutingProblem, jobs: &mut [JobIdx], rng: &mut SmallRng) {
        match self.sort_strategy {
            BestInsertionSortStrategy::Random => jobs.shuffle(rng),
            BestInsertionSortStrategy::Demand => {
                sort_by_key(jobs, |job_id| -problem.job(job_id).demand().total())
            }
            BestInsertionSortStrategy::Far => {
                sort_by_key(jobs, |job_id| -average_distance_from_starts(problem, job_id))
            }
            BestInsertionSortStrategy::Close => {
                sort_by_key(jobs, |job_id| average_distance_from_starts(problem, job_id))
            }
            BestInsertionSortStrategy::TimeWindow => {
                sort_by_key(jobs, |job_id| latest_end(problem, job_id))
            }
        }
    }

    fn should_blink(&self, rng: &mut SmallRng) -> bool {
        self.blink_rate > 0.0 && rng.random_bool(self.blink_rate)
    }
}

fn sort_by_key<F>(jobs: &mut [JobIdx], key: F)
where
    F: Fn(JobIdx) -> f64,
{
    let mut keyed: Vec<(f64, JobIdx)> = jobs.iter().map(|&job_id| (key(job_id), job_id)).collect();
    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    for (slot, (_, job_id)) in jobs.iter_mut().zip(keyed) {
        *slot = job_id;
    }
}

fn average_distance_from_starts(problem: &VehicleRoutingProblem, job_id: JobIdx) -> f64 {
    let location = Some(problem.job(job_id).primary_location_id());
    let vehicles = problem.vehicles();

    let total: f64 = vehicles
        .iter()
        .enumerate()
        .map(|(index, vehicle)| {
            problem
                .transport(
                    Some(vehicle.start_location_id()),
                    location,
                    vehicle.earliest_start(),
                    VehicleIdx::new(index),
                    None,
                )
                .distance
        })
        .sum();

    total / vehicles.len() as f64
}

fn latest_end(problem: &VehicleRoutingProblem, job_id: JobIdx) -> f64 {
    let job = problem.job(job_id);
    job.activity_ids(job_id)
        .into_iter()
        .map(|activity_id| job.stop(activity_id).time_windows())
        .filter(|time_windows| !time_windows.is_empty())
        .map(|time_windows| time_windows.latest_end())
        .reduce(f64::min)
        .unwrap_or(f64::INFINITY)
}

impl RecreateSolution for SequentialBestInsertion {
    #[instrument(skip_all, level = "debug", fields(jobs = jobs.len(), sort = %self.sort_strategy))]
    fn recreate_solution(
        &self,
        solution: &mut WorkingSolution,
        jobs: &[JobIdx],
        context: RecreateContext,
    ) -> Vec<JobIdx> {
        let mut ordered: Vec<JobIdx> = jobs.to_vec();
        ordered.sort_unstable();
        ordered.dedup();
        self.sort_jobs(solution.problem(), &mut ordered, context.rng);

        solution.begin_insertion(&ordered);
        let mut unassigned = Vec::new();

        for job_id in ordered {
            let mut best: Option<InsertionData> = None;

            for route_id in solution.candidate_routes() {
                if self.should_blink(context.rng) {
                    continue;
                }

                if let Some(data) =
                    calculate_insertion(solution, context.constraints, route_id, job_id)
                    && data.is_better_than(best.as_ref())
                {
                    best = Some(data);
                }
            }

            match best {
                Some(data) => solution.insert(&data.insertion),
                None => unassigned.push(job_id),
            }
        }

        if !unassigned.is_empty() {
            debug!(unassigned = unassigned.len(), "Sequential insertion left jobs unassigned");
        }

        unassigned.sort_unstable();
        unassigned
    }
}
