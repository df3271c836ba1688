use crate::{
    problem::{
        job::{Job, JobIdx},
        location::LocationIdx,
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// For each job, every other job ordered by increasing distance between their primary locations.
#[derive(Debug, Clone, Default)]
pub struct JobNeighborhoods {
    neighborhood: Vec<Vec<JobIdx>>,
}

impl JobNeighborhoods {
    /// `distance` is averaged over both directions so asymmetric matrices give a stable order.
    /// Ties keep the job order.
    pub fn new<F>(jobs: &[Job], distance: F) -> Self
    where
        F: Fn(LocationIdx, LocationIdx) -> f64,
    {
        let neighborhood = jobs
            .iter()
            .enumerate_idx()
            .map(|(job_id, job): (JobIdx, &Job)| {
                let from = job.primary_location_id();
                let mut neighbors: Vec<(JobIdx, f64)> = jobs
                    .iter()
                    .enumerate_idx()
                    .filter(|&(other_id, _): &(JobIdx, &Job)| other_id != job_id)
                    .map(|(other_id, other): (JobIdx, &Job)| {
                        let to = other.primary_location_id();
                        (other_id, 0.5 * (distance(from, to) + distance(to, from)))
                    })
                    .collect();

                neighbors.sort_by(|(a_id, a), (b_id, b)| a.total_cmp(b).then(a_id.cmp(b_id)));
                neighbors.into_iter().map(|(id, _)| id).collect()
            })
            .collect();

        JobNeighborhoods { neighborhood }
    }

    pub fn neighbors_iter(&self, job_id: JobIdx) -> impl Iterator<Item = JobIdx> + '_ {
        self.neighborhood[job_id.get()].iter().cloned()
    }
}
