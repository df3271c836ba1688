use crate::problem::vehicle::{Vehicle, VehicleIdx};

/// A finite fleet gets one route per vehicle. In an infinite fleet every vehicle is a template
/// that can be instantiated any number of times.
#[derive(Debug, Clone)]
pub enum Fleet {
    Finite(Vec<Vehicle>),
    Infinite(Vec<Vehicle>),
}

impl Fleet {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Fleet::Infinite(_))
    }

    #[inline]
    pub fn vehicles(&self) -> &[Vehicle] {
        match self {
            Fleet::Finite(vehicles) | Fleet::Infinite(vehicles) => vehicles,
        }
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        &self.vehicles()[vehicle_id]
    }
}
