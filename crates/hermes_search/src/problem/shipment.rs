use serde::{Deserialize, Serialize};

use crate::error::ProblemError;

use super::{
    capacity::Capacity,
    location::LocationIdx,
    service::DEFAULT_PRIORITY,
    skill::Skill,
    time_window::{TimeWindow, TimeWindows},
};

/// One end of a shipment.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ShipmentStop {
    location_id: LocationIdx,
    duration: f64,
    time_windows: TimeWindows,
}

impl ShipmentStop {
    pub fn new(location_id: impl Into<LocationIdx>, duration: f64, time_windows: Vec<TimeWindow>) -> Self {
        ShipmentStop {
            location_id: location_id.into(),
            duration,
            time_windows: TimeWindows::new(time_windows),
        }
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }
}

/// Goods picked up at one stop and delivered at another by the same vehicle, pickup first.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Shipment {
    external_id: String,
    demand: Capacity,
    pickup: ShipmentStop,
    delivery: ShipmentStop,
    priority: u8,
    skills: Vec<Skill>,
}

impl Shipment {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn pickup(&self) -> &ShipmentStop {
        &self.pickup
    }

    pub fn delivery(&self) -> &ShipmentStop {
        &self.delivery
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }
}

#[derive(Default)]
pub struct ShipmentBuilder {
    external_id: Option<String>,
    demand: Option<Capacity>,
    pickup: Option<ShipmentStop>,
    delivery: Option<ShipmentStop>,
    priority: Option<u8>,
    skills: Vec<Skill>,
}

impl ShipmentBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut ShipmentBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut ShipmentBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_pickup(&mut self, pickup: ShipmentStop) -> &mut ShipmentBuilder {
        self.pickup = Some(pickup);
        self
    }

    pub fn set_delivery(&mut self, delivery: ShipmentStop) -> &mut ShipmentBuilder {
        self.delivery = Some(delivery);
        self
    }

    pub fn set_priority(&mut self, priority: u8) -> &mut ShipmentBuilder {
        self.priority = Some(priority.clamp(1, 10));
        self
    }

    pub fn add_skill(&mut self, skill: Skill) -> &mut ShipmentBuilder {
        self.skills.push(skill);
        self
    }

    pub fn build(self) -> Result<Shipment, ProblemError> {
        Ok(Shipment {
            external_id: self
                .external_id
                .ok_or(ProblemError::MissingField("shipment.external_id"))?,
            pickup: self
                .pickup
                .ok_or(ProblemError::MissingField("shipment.pickup"))?,
            delivery: self
                .delivery
                .ok_or(ProblemError::MissingField("shipment.delivery"))?,
            demand: self.demand.unwrap_or_default(),
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            skills: self.skills,
        })
    }
}
