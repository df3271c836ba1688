use serde::Serialize;

use crate::{
    define_index_newtype,
    error::ProblemError,
    problem::{capacity::Capacity, vehicle_profile::VehicleProfileIdx},
};

define_index_newtype!(VehicleTypeIdx, VehicleType);

/// Capacity and pricing shared by every vehicle of the same type.
#[derive(Serialize, Debug, Clone)]
pub struct VehicleType {
    external_id: String,
    profile_id: VehicleProfileIdx,
    capacity: Capacity,
    fixed_cost: f64,
    cost_per_distance: f64,
    cost_per_time: f64,
    cost_per_waiting_time: f64,
    cost_per_service_time: f64,
}

impl VehicleType {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn profile_id(&self) -> VehicleProfileIdx {
        self.profile_id
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    /// Paid once when the vehicle serves at least one job.
    pub fn fixed_cost(&self) -> f64 {
        self.fixed_cost
    }

    pub fn cost_per_distance(&self) -> f64 {
        self.cost_per_distance
    }

    pub fn cost_per_time(&self) -> f64 {
        self.cost_per_time
    }

    pub fn cost_per_waiting_time(&self) -> f64 {
        self.cost_per_waiting_time
    }

    pub fn cost_per_service_time(&self) -> f64 {
        self.cost_per_service_time
    }
}

#[derive(Default)]
pub struct VehicleTypeBuilder {
    external_id: Option<String>,
    profile_id: Option<VehicleProfileIdx>,
    capacity: Option<Capacity>,
    fixed_cost: Option<f64>,
    cost_per_distance: Option<f64>,
    cost_per_time: Option<f64>,
    cost_per_waiting_time: Option<f64>,
    cost_per_service_time: Option<f64>,
}

impl VehicleTypeBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut VehicleTypeBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_profile_id(&mut self, profile_id: impl Into<VehicleProfileIdx>) -> &mut VehicleTypeBuilder {
        self.profile_id = Some(profile_id.into());
        self
    }

    pub fn set_capacity(&mut self, capacity: Capacity) -> &mut VehicleTypeBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_fixed_cost(&mut self, fixed_cost: f64) -> &mut VehicleTypeBuilder {
        self.fixed_cost = Some(fixed_cost);
        self
    }

    pub fn set_cost_per_distance(&mut self, cost: f64) -> &mut VehicleTypeBuilder {
        self.cost_per_distance = Some(cost);
        self
    }

    pub fn set_cost_per_time(&mut self, cost: f64) -> &mut VehicleTypeBuilder {
        self.cost_per_time = Some(cost);
        self
    }

    pub fn set_cost_per_waiting_time(&mut self, cost: f64) -> &mut VehicleTypeBuilder {
        self.cost_per_waiting_time = Some(cost);
        self
    }

    pub fn set_cost_per_service_time(&mut self, cost: f64) -> &mut VehicleTypeBuilder {
        self.cost_per_service_time = Some(cost);
        self
    }

    pub fn build(self) -> Result<VehicleType, ProblemError> {
        Ok(VehicleType {
            external_id: self
                .external_id
                .ok_or(ProblemError::MissingField("vehicle_type.external_id"))?,
            profile_id: self.profile_id.unwrap_or_default(),
            capacity: self.capacity.unwrap_or_default(),
            fixed_cost: self.fixed_cost.unwrap_or(0.0),
            cost_per_distance: self.cost_per_distance.unwrap_or(1.0),
            cost_per_time: self.cost_per_time.unwrap_or(0.0),
            cost_per_waiting_time: self.cost_per_waiting_time.unwrap_or(0.0),
            cost_per_service_time: self.cost_per_service_time.unwrap_or(0.0),
        })
    }
}
