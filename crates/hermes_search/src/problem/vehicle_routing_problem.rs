use crate::{
    error::{InfeasibilityReason, ProblemError},
    problem::{
        costs::{
            ActivityCosts, MatrixTransportCosts, TransportCost, TransportCosts,
            WaitingTimeActivityCosts,
        },
        driver::{Driver, DriverIdx},
        fleet::Fleet,
        job::{Job, JobIdx},
        location::{Location, LocationIdx},
        neighborhood::JobNeighborhoods,
        service::{DEFAULT_PRIORITY, Service},
        shipment::Shipment,
        skill::has_all_skills,
        travel_cost_matrix::Cost,
        vehicle::{Vehicle, VehicleIdx},
        vehicle_profile::VehicleProfile,
        vehicle_type::{VehicleType, VehicleTypeIdx},
    },
    solver::solution::activity::TourActivity,
};

/// The immutable input of the search: locations, jobs, fleet and the cost model.
///
/// Shared read-only between every search run.
pub struct VehicleRoutingProblem {
    locations: Vec<Location>,
    vehicle_types: Vec<VehicleType>,
    fleet: Fleet,
    drivers: Vec<Driver>,
    jobs: Vec<Job>,
    transport_costs: Box<dyn TransportCosts>,
    activity_costs: Box<dyn ActivityCosts>,
    neighborhoods: JobNeighborhoods,

    has_time_windows: bool,
    unassigned_job_cost: Cost,
    precomputed_vehicle_compatibilities: Vec<bool>,
}

impl std::fmt::Debug for VehicleRoutingProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleRoutingProblem").finish_non_exhaustive()
    }
}

impl VehicleRoutingProblem {
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, job_id: JobIdx) -> &Job {
        &self.jobs[job_id]
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.fleet.vehicles()
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        self.fleet.vehicle(vehicle_id)
    }

    pub fn vehicle_types(&self) -> &[VehicleType] {
        &self.vehicle_types
    }

    pub fn vehicle_type(&self, vehicle_type_id: VehicleTypeIdx) -> &VehicleType {
        &self.vehicle_types[vehicle_type_id]
    }

    pub fn vehicle_type_of(&self, vehicle_id: VehicleIdx) -> &VehicleType {
        self.vehicle_type(self.vehicle(vehicle_id).vehicle_type_id())
    }

    pub fn driver(&self, driver_id: DriverIdx) -> &Driver {
        &self.drivers[driver_id]
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn has_time_windows(&self) -> bool {
        self.has_time_windows
    }

    /// Travel between two optional locations. A missing end, as for open routes, is free.
    #[inline]
    pub fn transport(
        &self,
        from: Option<LocationIdx>,
        to: Option<LocationIdx>,
        departure_time: f64,
        vehicle_id: VehicleIdx,
        driver_id: Option<DriverIdx>,
    ) -> TransportCost {
        match (from, to) {
            (Some(from), Some(to)) => {
                let vehicle = self.vehicle(vehicle_id);
                self.transport_costs.transport(
                    from,
                    to,
                    departure_time,
                    vehicle,
                    self.vehicle_type(vehicle.vehicle_type_id()),
                    driver_id.map(|driver_id| self.driver(driver_id)),
                )
            }
            _ => TransportCost::ZERO,
        }
    }

    #[inline]
    pub fn activity_cost(
        &self,
        activity: &TourActivity,
        arrival_time: f64,
        vehicle_id: VehicleIdx,
        driver_id: Option<DriverIdx>,
    ) -> Cost {
        let vehicle = self.vehicle(vehicle_id);
        self.activity_costs.activity_cost(
            activity,
            arrival_time,
            vehicle,
            self.vehicle_type(vehicle.vehicle_type_id()),
            driver_id.map(|driver_id| self.driver(driver_id)),
        )
    }

    pub fn random_job<R>(&self, rng: &mut R) -> JobIdx
    where
        R: rand::Rng,
    {
        rng.random_range(0..self.jobs.len()).into()
    }

    pub fn nearest_jobs(&self, job_id: JobIdx) -> impl Iterator<Item = JobIdx> + '_ {
        self.neighborhoods.neighbors_iter(job_id)
    }

    pub fn is_job_compatible_with_vehicle(&self, vehicle_id: VehicleIdx, job_id: JobIdx) -> bool {
        self.precomputed_vehicle_compatibilities[vehicle_id.get() * self.jobs.len() + job_id.get()]
    }

    /// Penalty for leaving `job_id` unassigned, scaled by the job priority so that high priority
    /// jobs are the last ones given up.
    pub fn unassigned_job_cost(&self, job_id: JobIdx) -> Cost {
        self.unassigned_job_cost * self.job_priority_weight(job_id)
    }

    /// `1.0` for the default priority, more for higher priorities (lower numbers).
    pub fn job_priority_weight(&self, job_id: JobIdx) -> f64 {
        priority_weight(self.job(job_id).priority())
    }

    fn precompute_vehicle_compatibilities(vehicles: &[Vehicle], jobs: &[Job]) -> Vec<bool> {
        vehicles
            .iter()
            .flat_map(|vehicle| jobs.iter().map(|job| vehicle.is_compatible_with(job)))
            .collect()
    }

    /// Whether `vehicle_id` could serve `job` on an otherwise empty route.
    fn can_serve_alone(&self, vehicle_id: VehicleIdx, job_id: JobIdx) -> Result<(), InfeasibilityReason> {
        let vehicle = self.vehicle(vehicle_id);
        let job = self.job(job_id);

        if !job.demand().fits_in(self.vehicle_type_of(vehicle_id).capacity()) {
            return Err(InfeasibilityReason::Capacity);
        }

        if !has_all_skills(vehicle.skills(), job.skills()) {
            return Err(InfeasibilityReason::Skills);
        }

        let activity_ids = job.activity_ids(job_id);
        if vehicle
            .maximum_activities()
            .is_some_and(|maximum| activity_ids.len() > maximum)
        {
            return Err(InfeasibilityReason::MaximumActivities);
        }

        let mut location = Some(vehicle.start_location_id());
        let mut time = vehicle.earliest_start();
        for activity_id in activity_ids {
            let stop = job.stop(activity_id);
            let arrival = time
                + self
                    .transport(location, Some(stop.location_id()), time, vehicle_id, None)
                    .duration;

            let Some(start) = stop.time_windows().operation_start(arrival) else {
                return Err(InfeasibilityReason::TimeWindows);
            };

            time = start + stop.duration();
            location = Some(stop.location_id());
        }

        let end_arrival = time
            + self
                .transport(location, vehicle.end_location_id(), time, vehicle_id, None)
                .duration;

        if end_arrival > vehicle.latest_end() {
            return Err(InfeasibilityReason::TimeWindows);
        }

        Ok(())
    }

    fn validate_jobs(&self) -> Result<(), ProblemError> {
        for (index, job) in self.jobs.iter().enumerate() {
            let job_id = JobIdx::new(index);
            let mut failures = Vec::with_capacity(self.vehicles().len());

            let servable = (0..self.vehicles().len()).any(|vehicle_index| {
                match self.can_serve_alone(VehicleIdx::new(vehicle_index), job_id) {
                    Ok(()) => true,
                    Err(reason) => {
                        failures.push(reason);
                        false
                    }
                }
            });

            if !servable {
                let reason = match failures.first() {
                    Some(&first) if failures.iter().all(|&reason| reason == first) => first,
                    _ => InfeasibilityReason::Combined,
                };

                return Err(ProblemError::InfeasibleProblem {
                    job_id: job.external_id().to_owned(),
                    reason,
                });
            }
        }

        Ok(())
    }

    /// Twice the most expensive single-job round trip plus the largest fixed cost, so that serving a
    /// job is always cheaper than dropping it.
    fn default_unassigned_job_cost(&self) -> Cost {
        let mut max_cost: Cost = 0.0;

        for (vehicle_index, vehicle) in self.vehicles().iter().enumerate() {
            let vehicle_id = VehicleIdx::new(vehicle_index);
            let fixed_cost = self.vehicle_type(vehicle.vehicle_type_id()).fixed_cost();

            for job in &self.jobs {
                let location = Some(job.primary_location_id());
                let start = Some(vehicle.start_location_id());
                let round_trip = self.transport(start, location, 0.0, vehicle_id, None).cost
                    + self.transport(location, start, 0.0, vehicle_id, None).cost;

                max_cost = max_cost.max(round_trip + fixed_cost);
            }
        }

        (2.0 * max_cost).max(1.0)
    }
}

fn priority_weight(priority: u8) -> f64 {
    (11.0 - f64::from(priority)) / (11.0 - f64::from(DEFAULT_PRIORITY))
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    locations: Option<Vec<Location>>,
    vehicle_types: Option<Vec<VehicleType>>,
    vehicle_profiles: Option<Vec<VehicleProfile>>,
    transport_costs: Option<Box<dyn TransportCosts>>,
    activity_costs: Option<Box<dyn ActivityCosts>>,
    fleet: Option<Fleet>,
    drivers: Vec<Driver>,
    jobs: Vec<Job>,
    unassigned_job_cost: Option<Cost>,
}

impl VehicleRoutingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut VehicleRoutingProblemBuilder {
        self.locations = Some(locations);
        self
    }

    pub fn set_vehicle_types(&mut self, vehicle_types: Vec<VehicleType>) -> &mut VehicleRoutingProblemBuilder {
        self.vehicle_types = Some(vehicle_types);
        self
    }

    /// Uses [`MatrixTransportCosts`] over the given profiles.
    pub fn set_vehicle_profiles(
        &mut self,
        vehicle_profiles: Vec<VehicleProfile>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.vehicle_profiles = Some(vehicle_profiles);
        self
    }

    /// Replaces the matrix based transport costs.
    pub fn set_transport_costs(
        &mut self,
        transport_costs: Box<dyn TransportCosts>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.transport_costs = Some(transport_costs);
        self
    }

    pub fn set_activity_costs(
        &mut self,
        activity_costs: Box<dyn ActivityCosts>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.activity_costs = Some(activity_costs);
        self
    }

    pub fn set_fleet(&mut self, fleet: Fleet) -> &mut VehicleRoutingProblemBuilder {
        self.fleet = Some(fleet);
        self
    }

    pub fn set_drivers(&mut self, drivers: Vec<Driver>) -> &mut VehicleRoutingProblemBuilder {
        self.drivers = drivers;
        self
    }

    pub fn add_service(&mut self, service: Service) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.push(Job::Service(service));
        self
    }

    pub fn set_services(&mut self, services: Vec<Service>) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.extend(services.into_iter().map(Job::Service));
        self
    }

    pub fn add_shipment(&mut self, shipment: Shipment) -> &mut VehicleRoutingProblemBuilder {
        self.jobs.push(Job::Shipment(shipment));
        self
    }

    /// Base penalty for an unassigned job of default priority.
    pub fn set_unassigned_job_cost(&mut self, cost: Cost) -> &mut VehicleRoutingProblemBuilder {
        self.unassigned_job_cost = Some(cost);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, ProblemError> {
        let locations = self
            .locations
            .ok_or(ProblemError::MissingField("problem.locations"))?;
        let fleet = self.fleet.ok_or(ProblemError::MissingField("problem.fleet"))?;
        let vehicle_types = self
            .vehicle_types
            .ok_or(ProblemError::MissingField("problem.vehicle_types"))?;

        if fleet.vehicles().is_empty() {
            return Err(ProblemError::NoVehicles);
        }

        let profile_count = self.vehicle_profiles.as_ref().map(|profiles| profiles.len());
        let transport_costs: Box<dyn TransportCosts> = match (self.transport_costs, self.vehicle_profiles) {
            (Some(transport_costs), _) => transport_costs,
            (None, Some(profiles)) => Box::new(MatrixTransportCosts::new(profiles)),
            (None, None) => return Err(ProblemError::MissingField("problem.vehicle_profiles")),
        };

        if let Some(profile_count) = profile_count {
            for vehicle_type in &vehicle_types {
                if vehicle_type.profile_id().get() >= profile_count {
                    return Err(ProblemError::UnknownProfile {
                        profile: vehicle_type.profile_id().get(),
                        vehicle_type: vehicle_type.external_id().to_owned(),
                    });
                }
            }
        }

        let check_location = |location_id: LocationIdx, referenced_by: &str| {
            if location_id.get() >= locations.len() {
                Err(ProblemError::UnknownLocation {
                    location: location_id.get(),
                    referenced_by: referenced_by.to_owned(),
                })
            } else {
                Ok(())
            }
        };

        for vehicle in fleet.vehicles() {
            if vehicle.vehicle_type_id().get() >= vehicle_types.len() {
                return Err(ProblemError::UnknownVehicleType {
                    vehicle_type: vehicle.vehicle_type_id().get(),
                    vehicle: vehicle.external_id().to_owned(),
                });
            }
            check_location(vehicle.start_location_id(), vehicle.external_id())?;
            if let Some(end) = vehicle.end_location_id() {
                check_location(end, vehicle.external_id())?;
            }
        }

        for job in &self.jobs {
            for activity_id in job.activity_ids(JobIdx::new(0)) {
                check_location(job.stop(activity_id).location_id(), job.external_id())?;
            }
        }

        let precomputed_vehicle_compatibilities =
            VehicleRoutingProblem::precompute_vehicle_compatibilities(fleet.vehicles(), &self.jobs);

        let mut problem = VehicleRoutingProblem {
            has_time_windows: self.jobs.iter().any(|job| job.has_time_windows()),
            locations,
            vehicle_types,
            fleet,
            drivers: self.drivers,
            jobs: self.jobs,
            transport_costs,
            activity_costs: self
                .activity_costs
                .unwrap_or_else(|| Box::new(WaitingTimeActivityCosts)),
            neighborhoods: JobNeighborhoods::default(),
            unassigned_job_cost: 0.0,
            precomputed_vehicle_compatibilities,
        };

        problem.validate_jobs()?;

        let reference_vehicle = VehicleIdx::new(0);
        problem.neighborhoods = JobNeighborhoods::new(&problem.jobs, |from, to| {
            problem
                .transport(Some(from), Some(to), 0.0, reference_vehicle, None)
                .distance
        });
        problem.unassigned_job_cost = self
            .unassigned_job_cost
            .unwrap_or_else(|| problem.default_unassigned_job_cost());

        Ok(problem)
    }
}
