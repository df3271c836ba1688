use serde::{Deserialize, Serialize};

use crate::error::ProblemError;

use super::{
    capacity::Capacity,
    location::LocationIdx,
    skill::Skill,
    time_window::{TimeWindow, TimeWindows},
};

/// How a single-stop job changes the vehicle load.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ServiceType {
    /// Picked up and carried until the end of the route, like a pickup.
    #[default]
    Service,
    Pickup,
    /// Loaded at the start of the route and dropped at the stop.
    Delivery,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Service {
    external_id: String,
    service_type: ServiceType,
    location_id: LocationIdx,
    time_windows: TimeWindows,
    demand: Capacity,
    duration: f64,
    priority: u8,
    skills: Vec<Skill>,
}

impl Service {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }
}

pub const DEFAULT_PRIORITY: u8 = 2;

#[derive(Default)]
pub struct ServiceBuilder {
    external_id: Option<String>,
    service_type: Option<ServiceType>,
    location_id: Option<LocationIdx>,
    time_windows: Vec<TimeWindow>,
    demand: Option<Capacity>,
    duration: Option<f64>,
    priority: Option<u8>,
    skills: Vec<Skill>,
}

impl ServiceBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut ServiceBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_service_type(&mut self, service_type: ServiceType) -> &mut ServiceBuilder {
        self.service_type = Some(service_type);
        self
    }

    pub fn set_location_id(&mut self, location_id: impl Into<LocationIdx>) -> &mut ServiceBuilder {
        self.location_id = Some(location_id.into());
        self
    }

    pub fn add_time_window(&mut self, time_window: TimeWindow) -> &mut ServiceBuilder {
        self.time_windows.push(time_window);
        self
    }

    pub fn set_time_windows(&mut self, time_windows: Vec<TimeWindow>) -> &mut ServiceBuilder {
        self.time_windows = time_windows;
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut ServiceBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_duration(&mut self, duration: f64) -> &mut ServiceBuilder {
        self.duration = Some(duration);
        self
    }

    /// 1 is the highest priority, 10 the lowest.
    pub fn set_priority(&mut self, priority: u8) -> &mut ServiceBuilder {
        self.priority = Some(priority.clamp(1, 10));
        self
    }

    pub fn add_skill(&mut self, skill: Skill) -> &mut ServiceBuilder {
        self.skills.push(skill);
        self
    }

    pub fn build(self) -> Result<Service, ProblemError> {
        Ok(Service {
            external_id: self
                .external_id
                .ok_or(ProblemError::MissingField("service.external_id"))?,
            location_id: self
                .location_id
                .ok_or(ProblemError::MissingField("service.location_id"))?,
            service_type: self.service_type.unwrap_or_default(),
            demand: self.demand.unwrap_or_default(),
            duration: self.duration.unwrap_or(0.0),
            time_windows: TimeWindows::new(self.time_windows),
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            skills: self.skills,
        })
    }
}
