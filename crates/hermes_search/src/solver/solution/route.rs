use crate::problem::{
    driver::DriverIdx,
    job::{ActivityId, JobIdx},
    vehicle::{Vehicle, VehicleIdx},
    vehicle_routing_problem::VehicleRoutingProblem,
};

use super::activity::TourActivity;

/// Ordered visiting sequence of one vehicle, always framed by a start and an end activity.
///
/// Positions passed to the accessors index [`VehicleRoute::activities`], so `0` is the start
/// and `len() + 1` the end. The sequence only changes through [`WorkingSolution`] which bumps
/// [`VehicleRoute::version`] and repropagates the route states.
///
/// [`WorkingSolution`]: super::working_solution::WorkingSolution
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRoute {
    vehicle_id: VehicleIdx,
    driver_id: Option<DriverIdx>,
    activities: Vec<TourActivity>,
    version: usize,
}

impl VehicleRoute {
    pub fn empty(problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Self {
        let vehicle = problem.vehicle(vehicle_id);

        VehicleRoute {
            vehicle_id,
            driver_id: None,
            activities: vec![TourActivity::start(vehicle), TourActivity::end(vehicle)],
            version: 0,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn vehicle<'a>(&self, problem: &'a VehicleRoutingProblem) -> &'a Vehicle {
        problem.vehicle(self.vehicle_id)
    }

    pub fn driver_id(&self) -> Option<DriverIdx> {
        self.driver_id
    }

    /// Incremented on every change of the activity sequence.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Number of job activities.
    #[inline]
    pub fn len(&self) -> usize {
        self.activities.len() - 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn activities(&self) -> &[TourActivity] {
        &self.activities
    }

    #[inline]
    pub fn activity(&self, position: usize) -> &TourActivity {
        &self.activities[position]
    }

    pub fn job_activities(&self) -> &[TourActivity] {
        &self.activities[1..self.activities.len() - 1]
    }

    pub fn start(&self) -> &TourActivity {
        &self.activities[0]
    }

    pub fn end(&self) -> &TourActivity {
        &self.activities[self.activities.len() - 1]
    }

    pub fn departure_time(&self) -> f64 {
        self.start().end_time()
    }

    /// Distinct jobs in visiting order of their first activity.
    pub fn job_ids(&self) -> impl Iterator<Item = JobIdx> + '_ {
        self.job_activities()
            .iter()
            .filter_map(|activity| match activity.activity_id() {
                Some(ActivityId::ShipmentDelivery(_)) => None,
                other => other.map(|activity_id| activity_id.job_id()),
            })
    }

    pub fn position_of(&self, activity_id: ActivityId) -> Option<usize> {
        self.activities
            .iter()
            .position(|activity| activity.activity_id() == Some(activity_id))
    }

    pub fn contains_job(&self, job_id: JobIdx) -> bool {
        self.job_activities()
            .iter()
            .any(|activity| activity.job_id() == Some(job_id))
    }

    /// Inserts `activity` so that it ends up at `position`, between the start and the end.
    pub(super) fn insert_activity(&mut self, position: usize, activity: TourActivity) {
        assert!(
            position >= 1 && position < self.activities.len(),
            "Cannot insert an activity outside of the start and end of the route"
        );
        self.activities.insert(position, activity);
        self.version += 1;
    }

    /// Removes every activity of `job_id`, returns how many were removed.
    pub(super) fn remove_job(&mut self, job_id: JobIdx) -> usize {
        let before = self.activities.len();
        self.activities
            .retain(|activity| activity.job_id() != Some(job_id));

        let removed = before - self.activities.len();
        if removed > 0 {
            self.version += 1;
        }

        removed
    }

    pub(crate) fn activity_mut(&mut self, position: usize) -> &mut TourActivity {
        &mut self.activities[position]
    }

    pub(crate) fn reset_schedule(&mut self) {
        for activity in &mut self.activities {
            activity.reset_schedule();
        }
    }
}
