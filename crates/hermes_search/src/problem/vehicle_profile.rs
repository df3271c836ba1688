use crate::{
    define_index_newtype,
    problem::{
        location::LocationIdx,
        travel_cost_matrix::{Distance, Time, TravelMatrices},
    },
};

define_index_newtype!(VehicleProfileIdx, VehicleProfile);

/// A named set of travel matrices, e.g. one per mode of transport.
#[derive(Debug, Clone)]
pub struct VehicleProfile {
    external_id: String,
    travel_costs: TravelMatrices,
}

impl VehicleProfile {
    pub fn new(external_id: impl Into<String>, travel_costs: TravelMatrices) -> Self {
        Self {
            external_id: external_id.into(),
            travel_costs,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.travel_costs.travel_distance(from, to)
    }

    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> Time {
        self.travel_costs.travel_time(from, to)
    }

    pub fn travel_costs(&self) -> &TravelMatrices {
        &self.travel_costs
    }
}
