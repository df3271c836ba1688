use std::sync::Arc;

use rand::RngCore;

use crate::{
    error::ProblemError,
    problem::{
        capacity::Capacity,
        fleet::Fleet,
        job::{Job, JobIdx},
        location::Location,
        service::{Service, ServiceBuilder},
        shipment::{ShipmentBuilder, ShipmentStop},
        skill::Skill,
        travel_cost_matrix::TravelMatrices,
        vehicle::{Vehicle, VehicleBuilder},
        vehicle_profile::VehicleProfile,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        vehicle_type::{VehicleType, VehicleTypeBuilder},
    },
    solver::{
        insertion::{Insertion, ServiceInsertion, ShipmentInsertion},
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
        state::StateManager,
    },
};

pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    let mut locations = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let location = Location::from_cartesian(x as f64, y as f64);
            locations.push(location);
        }
    }

    locations
}

pub fn create_basic_services(location_ids: Vec<usize>) -> Vec<Service> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = ServiceBuilder::default();

            builder.set_location_id(location_id);
            builder.set_external_id(index.to_string());
            builder.build().unwrap()
        })
        .collect()
}

pub fn create_basic_vehicles(location_ids: Vec<usize>) -> Vec<Vehicle> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = VehicleBuilder::default();
            builder.set_start_location_id(location_id);
            builder.set_external_id(index.to_string());
            builder.set_vehicle_type_id(0);
            builder.build().unwrap()
        })
        .collect()
}

fn create_basic_vehicle_type() -> VehicleType {
    let mut builder = VehicleTypeBuilder::default();
    builder.set_external_id("test_type").set_profile_id(0);
    builder.build().unwrap()
}

/// Euclidean travel, one vehicle type costing 1 per distance unit, finite fleet.
pub fn create_test_problem(
    locations: Vec<Location>,
    services: Vec<Service>,
    vehicles: Vec<Vehicle>,
) -> VehicleRoutingProblem {
    let mut builder = VehicleRoutingProblemBuilder::default();

    builder.set_vehicle_profiles(vec![VehicleProfile::new(
        "test_profile",
        TravelMatrices::from_euclidean(&locations),
    )]);
    builder.set_vehicle_types(vec![create_basic_vehicle_type()]);
    builder.set_services(services);
    builder.set_locations(locations);
    builder.set_fleet(Fleet::Finite(vehicles));

    builder.build().unwrap()
}

/// Problem builder for tests that need more than plain services.
///
/// Jobs get their insertion index as external id. Every vehicle shares one vehicle type.
pub struct TestProblem {
    pub locations: Vec<Location>,
    pub vehicle_locations: Vec<usize>,
    /// Skills per vehicle, missing entries mean no skill.
    pub vehicle_skills: Vec<Vec<String>>,
    pub capacity: Option<Capacity>,
    pub fixed_cost: f64,
    pub cost_per_waiting_time: f64,
    pub latest_end: Option<f64>,
    pub return_to_depot: bool,
    pub variable_departure: bool,
    pub infinite_fleet: bool,
    pub maximum_activities: Option<usize>,
    pub unassigned_job_cost: Option<f64>,
    jobs: Vec<Job>,
}

impl TestProblem {
    pub fn new(locations: Vec<Location>) -> Self {
        TestProblem {
            locations,
            vehicle_locations: vec![0],
            vehicle_skills: Vec::new(),
            capacity: None,
            fixed_cost: 0.0,
            cost_per_waiting_time: 0.0,
            latest_end: None,
            return_to_depot: true,
            variable_departure: false,
            infinite_fleet: false,
            maximum_activities: None,
            unassigned_job_cost: None,
            jobs: Vec::new(),
        }
    }

    /// `rows` x `cols` unit grid, location `y * cols + x` is at `(x, y)`.
    pub fn grid(rows: usize, cols: usize) -> Self {
        TestProblem::new(create_location_grid(rows, cols))
    }

    pub fn add_service<F>(&mut self, location_id: usize, configure: F) -> JobIdx
    where
        F: FnOnce(&mut ServiceBuilder),
    {
        let mut builder = ServiceBuilder::default();
        builder
            .set_external_id(self.jobs.len().to_string())
            .set_location_id(location_id);
        configure(&mut builder);

        self.jobs.push(Job::Service(builder.build().unwrap()));
        JobIdx::new(self.jobs.len() - 1)
    }

    pub fn add_shipment<F>(&mut self, pickup_location_id: usize, delivery_location_id: usize, configure: F) -> JobIdx
    where
        F: FnOnce(&mut ShipmentBuilder),
    {
        let mut builder = ShipmentBuilder::default();
        builder
            .set_external_id(self.jobs.len().to_string())
            .set_pickup(ShipmentStop::new(pickup_location_id, 0.0, vec![]))
            .set_delivery(ShipmentStop::new(delivery_location_id, 0.0, vec![]));
        configure(&mut builder);

        self.jobs.push(Job::Shipment(builder.build().unwrap()));
        JobIdx::new(self.jobs.len() - 1)
    }

    pub fn try_build(self) -> Result<VehicleRoutingProblem, ProblemError> {
        let mut vehicle_type = VehicleTypeBuilder::default();
        vehicle_type
            .set_external_id("test_type")
            .set_profile_id(0)
            .set_fixed_cost(self.fixed_cost)
            .set_cost_per_waiting_time(self.cost_per_waiting_time);
        if let Some(capacity) = self.capacity {
            vehicle_type.set_capacity(capacity);
        }

        let vehicles = self
            .vehicle_locations
            .iter()
            .enumerate()
            .map(|(index, &location_id)| {
                let mut builder = VehicleBuilder::default();
                builder
                    .set_external_id(index.to_string())
                    .set_vehicle_type_id(0)
                    .set_start_location_id(location_id)
                    .set_return_to_depot(self.return_to_depot)
                    .set_variable_departure(self.variable_departure);
                if let Some(latest_end) = self.latest_end {
                    builder.set_latest_end(latest_end);
                }
                if let Some(maximum_activities) = self.maximum_activities {
                    builder.set_maximum_activities(maximum_activities);
                }
                for skill in self.vehicle_skills.get(index).into_iter().flatten() {
                    builder.add_skill(Skill::new(skill.as_str()));
                }
                builder.build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_vehicle_profiles(vec![VehicleProfile::new(
                "test_profile",
                TravelMatrices::from_euclidean(&self.locations),
            )])
            .set_vehicle_types(vec![vehicle_type.build()?])
            .set_locations(self.locations)
            .set_fleet(if self.infinite_fleet {
                Fleet::Infinite(vehicles)
            } else {
                Fleet::Finite(vehicles)
            });

        for job in self.jobs {
            match job {
                Job::Service(service) => builder.add_service(service),
                Job::Shipment(shipment) => builder.add_shipment(shipment),
            };
        }

        if let Some(cost) = self.unassigned_job_cost {
            builder.set_unassigned_job_cost(cost);
        }

        builder.build()
    }

    pub fn build(self) -> VehicleRoutingProblem {
        self.try_build().unwrap()
    }
}

pub struct TestRoute {
    pub vehicle_id: usize,
    pub job_ids: Vec<usize>,
}

/// Builds a solution by appending the jobs of every test route in order, shipments get their
/// pickup and delivery next to each other.
pub fn create_test_working_solution(
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<TestRoute>,
) -> WorkingSolution {
    let mut solution = WorkingSolution::new(problem, Arc::new(StateManager::with_core_updaters()));

    for route in routes.iter() {
        let route_id = RouteIdx::new(route.vehicle_id);
        for &job_id in route.job_ids.iter() {
            let position = solution.route(route_id).len();
            let job_index = JobIdx::new(job_id);
            let insertion = if solution.problem().job(job_index).is_shipment() {
                Insertion::Shipment(ShipmentInsertion {
                    route_id,
                    job_index,
                    pickup_position: position,
                    delivery_position: position,
                })
            } else {
                Insertion::Service(ServiceInsertion {
                    route_id,
                    job_index,
                    position,
                })
            };

            solution.insert(&insertion);
        }
    }

    solution
}

pub struct MockRng {
    data: Vec<u64>,
    index: usize,
}

impl MockRng {
    pub fn new(data: Vec<u64>) -> Self {
        MockRng { data, index: 0 }
    }
}

impl RngCore for MockRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.data[self.index % self.data.len()];
        self.index = (self.index + 1) % self.data.len();
        value
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst.iter_mut() {
            *byte = 0;
        }
    }
}
