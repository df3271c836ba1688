use serde::Serialize;

use crate::{
    define_index_newtype,
    error::ProblemError,
    problem::{
        job::Job,
        location::LocationIdx,
        skill::{Skill, has_all_skills},
        vehicle_type::VehicleTypeIdx,
    },
};

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    external_id: String,
    vehicle_type_id: VehicleTypeIdx,
    start_location_id: LocationIdx,
    end_location_id: Option<LocationIdx>,
    return_to_depot: bool,
    earliest_start: f64,
    latest_end: f64,
    variable_departure: bool,
    maximum_activities: Option<usize>,
    skills: Vec<Skill>,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn vehicle_type_id(&self) -> VehicleTypeIdx {
        self.vehicle_type_id
    }

    pub fn start_location_id(&self) -> LocationIdx {
        self.start_location_id
    }

    /// Where the route ends, `None` for open routes that stop at the last job.
    pub fn end_location_id(&self) -> Option<LocationIdx> {
        if self.return_to_depot {
            Some(self.end_location_id.unwrap_or(self.start_location_id))
        } else {
            None
        }
    }

    pub fn return_to_depot(&self) -> bool {
        self.return_to_depot
    }

    pub fn earliest_start(&self) -> f64 {
        self.earliest_start
    }

    pub fn latest_end(&self) -> f64 {
        self.latest_end
    }

    /// Whether the vehicle may leave later than its earliest start to avoid waiting.
    pub fn has_variable_departure(&self) -> bool {
        self.variable_departure
    }

    pub fn maximum_activities(&self) -> Option<usize> {
        self.maximum_activities
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn is_compatible_with(&self, job: &Job) -> bool {
        has_all_skills(&self.skills, job.skills())
    }

    /// Two vehicles are interchangeable for an empty route when every routing attribute matches.
    pub fn is_equivalent_to(&self, other: &Vehicle) -> bool {
        self.vehicle_type_id == other.vehicle_type_id
            && self.start_location_id == other.start_location_id
            && self.end_location_id() == other.end_location_id()
            && self.earliest_start == other.earliest_start
            && self.latest_end == other.latest_end
            && self.variable_departure == other.variable_departure
            && self.maximum_activities == other.maximum_activities
            && self.skills == other.skills
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    vehicle_type_id: Option<VehicleTypeIdx>,
    start_location_id: Option<LocationIdx>,
    end_location_id: Option<LocationIdx>,
    return_to_depot: Option<bool>,
    earliest_start: Option<f64>,
    latest_end: Option<f64>,
    variable_departure: Option<bool>,
    maximum_activities: Option<usize>,
    skills: Vec<Skill>,
}

impl VehicleBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut VehicleBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_vehicle_type_id(&mut self, vehicle_type_id: impl Into<VehicleTypeIdx>) -> &mut VehicleBuilder {
        self.vehicle_type_id = Some(vehicle_type_id.into());
        self
    }

    pub fn set_start_location_id(&mut self, location_id: impl Into<LocationIdx>) -> &mut VehicleBuilder {
        self.start_location_id = Some(location_id.into());
        self
    }

    pub fn set_end_location_id(&mut self, location_id: impl Into<LocationIdx>) -> &mut VehicleBuilder {
        self.end_location_id = Some(location_id.into());
        self
    }

    pub fn set_return_to_depot(&mut self, return_to_depot: bool) -> &mut VehicleBuilder {
        self.return_to_depot = Some(return_to_depot);
        self
    }

    pub fn set_earliest_start(&mut self, earliest_start: f64) -> &mut VehicleBuilder {
        self.earliest_start = Some(earliest_start);
        self
    }

    pub fn set_latest_end(&mut self, latest_end: f64) -> &mut VehicleBuilder {
        self.latest_end = Some(latest_end);
        self
    }

    pub fn set_variable_departure(&mut self, variable_departure: bool) -> &mut VehicleBuilder {
        self.variable_departure = Some(variable_departure);
        self
    }

    pub fn set_maximum_activities(&mut self, maximum_activities: usize) -> &mut VehicleBuilder {
        self.maximum_activities = Some(maximum_activities);
        self
    }

    pub fn add_skill(&mut self, skill: Skill) -> &mut VehicleBuilder {
        self.skills.push(skill);
        self
    }

    pub fn build(self) -> Result<Vehicle, ProblemError> {
        let mut skills = self.skills;
        skills.sort();
        skills.dedup();

        Ok(Vehicle {
            external_id: self
                .external_id
                .ok_or(ProblemError::MissingField("vehicle.external_id"))?,
            vehicle_type_id: self.vehicle_type_id.unwrap_or_default(),
            start_location_id: self
                .start_location_id
                .ok_or(ProblemError::MissingField("vehicle.start_location_id"))?,
            end_location_id: self.end_location_id,
            return_to_depot: self.return_to_depot.unwrap_or(true),
            earliest_start: self.earliest_start.unwrap_or(0.0),
            latest_end: self.latest_end.unwrap_or(f64::INFINITY),
            variable_departure: self.variable_departure.unwrap_or(false),
            maximum_activities: self.maximum_activities,
            skills,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_route_has_no_end_location() {
        let mut builder = VehicleBuilder::default();
        builder
            .set_external_id("open")
            .set_start_location_id(3)
            .set_end_location_id(4)
            .set_return_to_depot(false);
        let vehicle = builder.build().unwrap();

        assert_eq!(vehicle.end_location_id(), None);

        let mut builder = VehicleBuilder::default();
        builder.set_external_id("closed").set_start_location_id(3);
        let vehicle = builder.build().unwrap();

        assert_eq!(vehicle.end_location_id(), Some(LocationIdx::new(3)));
        assert_eq!(vehicle.latest_end(), f64::INFINITY);
    }
}
