use serde::Serialize;

use crate::problem::{
    capacity::Capacity,
    job::{ActivityId, JobIdx},
    location::LocationIdx,
    time_window::TimeWindows,
    vehicle::Vehicle,
    vehicle_routing_problem::VehicleRoutingProblem,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Start,
    End,
    Job(ActivityId),
}

/// One stop of a route. The static part is copied from the job or vehicle it comes from, the
/// schedule (`arrival_time`, `end_time`, `load`) is written by the state updaters only.
#[derive(Debug, Clone, PartialEq)]
pub struct TourActivity {
    kind: ActivityKind,
    location_id: Option<LocationIdx>,
    duration: f64,
    time_windows: TimeWindows,
    load_change: Capacity,

    arrival_time: f64,
    end_time: f64,
    load: Capacity,
}

impl TourActivity {
    fn new(
        kind: ActivityKind,
        location_id: Option<LocationIdx>,
        duration: f64,
        time_windows: TimeWindows,
        load_change: Capacity,
    ) -> Self {
        TourActivity {
            kind,
            location_id,
            duration,
            time_windows,
            load_change,
            arrival_time: 0.0,
            end_time: 0.0,
            load: Capacity::EMPTY,
        }
    }

    pub fn start(vehicle: &Vehicle) -> Self {
        TourActivity::new(
            ActivityKind::Start,
            Some(vehicle.start_location_id()),
            0.0,
            TimeWindows::single(vehicle.earliest_start(), vehicle.latest_end()),
            Capacity::EMPTY,
        )
    }

    /// Open routes end wherever the last job is, the end has no location of its own.
    pub fn end(vehicle: &Vehicle) -> Self {
        TourActivity::new(
            ActivityKind::End,
            vehicle.end_location_id(),
            0.0,
            TimeWindows::single(vehicle.earliest_start(), vehicle.latest_end()),
            Capacity::EMPTY,
        )
    }

    pub fn for_job(problem: &VehicleRoutingProblem, activity_id: ActivityId) -> Self {
        let stop = problem.job(activity_id.job_id()).stop(activity_id);

        TourActivity::new(
            ActivityKind::Job(activity_id),
            Some(stop.location_id()),
            stop.duration(),
            stop.time_windows().clone(),
            stop.load_change(),
        )
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn activity_id(&self) -> Option<ActivityId> {
        match self.kind {
            ActivityKind::Job(activity_id) => Some(activity_id),
            _ => None,
        }
    }

    pub fn job_id(&self) -> Option<JobIdx> {
        self.activity_id().map(|activity_id| activity_id.job_id())
    }

    pub fn is_start(&self) -> bool {
        self.kind == ActivityKind::Start
    }

    pub fn is_end(&self) -> bool {
        self.kind == ActivityKind::End
    }

    pub fn location_id(&self) -> Option<LocationIdx> {
        self.location_id
    }

    /// Service time at the stop.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }

    pub fn earliest_start(&self) -> f64 {
        self.time_windows.earliest_start()
    }

    pub fn latest_start(&self) -> f64 {
        self.time_windows.latest_end()
    }

    /// Signed load delta applied when the activity is served.
    pub fn load_change(&self) -> &Capacity {
        &self.load_change
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    /// When the vehicle leaves the activity.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn operation_start(&self) -> f64 {
        self.end_time - self.duration
    }

    pub fn waiting_time(&self) -> f64 {
        (self.operation_start() - self.arrival_time).max(0.0)
    }

    /// Load on board after the activity.
    pub fn load(&self) -> &Capacity {
        &self.load
    }

    pub(crate) fn set_times(&mut self, arrival_time: f64, end_time: f64) {
        self.arrival_time = arrival_time;
        self.end_time = end_time;
    }

    pub(crate) fn set_load(&mut self, load: Capacity) {
        self.load = load;
    }

    pub(crate) fn reset_schedule(&mut self) {
        self.arrival_time = 0.0;
        self.end_time = 0.0;
        self.load = Capacity::EMPTY;
    }
}
