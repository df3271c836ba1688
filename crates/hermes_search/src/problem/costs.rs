use crate::{
    problem::{
        driver::Driver,
        location::LocationIdx,
        travel_cost_matrix::{Cost, Distance, Time},
        vehicle::Vehicle,
        vehicle_profile::VehicleProfile,
        vehicle_type::VehicleType,
    },
    solver::solution::activity::TourActivity,
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransportCost {
    pub distance: Distance,
    pub duration: Time,
    pub cost: Cost,
}

impl TransportCost {
    pub const ZERO: TransportCost = TransportCost {
        distance: 0.0,
        duration: 0.0,
        cost: 0.0,
    };
}

/// Travel between two locations for a vehicle leaving at `departure_time`.
pub trait TransportCosts: Send + Sync {
    fn transport(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: f64,
        vehicle: &Vehicle,
        vehicle_type: &VehicleType,
        driver: Option<&Driver>,
    ) -> TransportCost;
}

/// Cost of performing an activity given the time the vehicle arrives there.
pub trait ActivityCosts: Send + Sync {
    fn activity_cost(
        &self,
        activity: &TourActivity,
        arrival_time: f64,
        vehicle: &Vehicle,
        vehicle_type: &VehicleType,
        driver: Option<&Driver>,
    ) -> Cost;
}

/// Looks distances and times up in the matrices of the vehicle type's profile and prices them
/// with the type's per-distance and per-time rates. Time independent.
pub struct MatrixTransportCosts {
    profiles: Vec<VehicleProfile>,
}

impl MatrixTransportCosts {
    pub fn new(profiles: Vec<VehicleProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[VehicleProfile] {
        &self.profiles
    }
}

impl TransportCosts for MatrixTransportCosts {
    #[inline]
    fn transport(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        _departure_time: f64,
        _vehicle: &Vehicle,
        vehicle_type: &VehicleType,
        _driver: Option<&Driver>,
    ) -> TransportCost {
        let profile = &self.profiles[vehicle_type.profile_id()];
        let distance = profile.travel_distance(from, to);
        let duration = profile.travel_time(from, to);

        TransportCost {
            distance,
            duration,
            cost: distance * vehicle_type.cost_per_distance()
                + duration * vehicle_type.cost_per_time(),
        }
    }
}

/// Prices the time a vehicle waits for a window to open and the time spent serving.
#[derive(Default)]
pub struct WaitingTimeActivityCosts;

impl ActivityCosts for WaitingTimeActivityCosts {
    fn activity_cost(
        &self,
        activity: &TourActivity,
        arrival_time: f64,
        _vehicle: &Vehicle,
        vehicle_type: &VehicleType,
        _driver: Option<&Driver>,
    ) -> Cost {
        let waiting = activity
            .time_windows()
            .operation_start(arrival_time)
            .map(|start| start - arrival_time)
            .unwrap_or(0.0);

        waiting * vehicle_type.cost_per_waiting_time()
            + activity.duration() * vehicle_type.cost_per_service_time()
    }
}
