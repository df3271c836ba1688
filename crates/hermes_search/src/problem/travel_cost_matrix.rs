use std::sync::Arc;

use serde::Deserialize;

use crate::problem::location::{Location, LocationIdx};

pub type Distance = f64;
pub type Time = f64;
pub type Cost = f64;

/// Distances and travel times between every pair of locations, stored as flat row-major
/// matrices: the entry for a pair lives at `from * num_locations + to`.
#[derive(Deserialize, Debug, Clone)]
pub struct TravelMatrices {
    distances: Arc<Vec<Distance>>,
    times: Arc<Vec<Time>>,
    num_locations: usize,
}

impl TravelMatrices {
    pub fn new(distances: Vec<Vec<Distance>>, times: Vec<Vec<Time>>) -> Self {
        let num_locations = distances.len();

        TravelMatrices {
            distances: Arc::new(distances.into_iter().flatten().collect()),
            times: Arc::new(times.into_iter().flatten().collect()),
            num_locations,
        }
    }

    /// Straight-line distances, with travel time equal to the distance.
    pub fn from_euclidean(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                distances[i * num_locations + j] = from.euclidean_distance(to);
            }
        }

        let distances = Arc::new(distances);
        let times = Arc::clone(&distances);

        TravelMatrices {
            distances,
            times,
            num_locations,
        }
    }

    #[cfg(test)]
    pub fn from_constant(num_locations: usize, distance: f64, time: f64) -> Self {
        TravelMatrices {
            distances: Arc::new(vec![distance; num_locations * num_locations]),
            times: Arc::new(vec![time; num_locations * num_locations]),
            num_locations,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> Time {
        if from == to {
            return 0.0;
        }

        self.times[self.index(from, to)]
    }

    pub fn max_distance(&self) -> Distance {
        self.distances.iter().cloned().fold(0.0, f64::max)
    }

    pub fn max_time(&self) -> Time {
        self.times.iter().cloned().fold(0.0, f64::max)
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}
