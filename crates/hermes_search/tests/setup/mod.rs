#![allow(dead_code)]

use hermes_search::problem::{
    capacity::Capacity,
    fleet::Fleet,
    location::Location,
    service::{Service, ServiceBuilder},
    time_window::TimeWindow,
    travel_cost_matrix::TravelMatrices,
    vehicle::{Vehicle, VehicleBuilder},
    vehicle_profile::VehicleProfile,
    vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    vehicle_type::VehicleTypeBuilder,
};

/// `rows` x `cols` unit grid, location `y * cols + x` is at `(x, y)`.
pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    (0..rows)
        .flat_map(|y| (0..cols).map(move |x| Location::from_cartesian(x as f64, y as f64)))
        .collect()
}

pub fn create_service(index: usize, location_id: usize, demand: Option<f64>, time_window: Option<(f64, f64)>) -> Service {
    let mut builder = ServiceBuilder::default();
    builder
        .set_external_id(format!("service_{index}"))
        .set_location_id(location_id);

    if let Some(demand) = demand {
        builder.set_demand(Capacity::from_vec(vec![demand]));
    }
    if let Some((start, end)) = time_window {
        builder.add_time_window(TimeWindow::new(start, end));
    }

    builder.build().unwrap()
}

pub fn create_services(location_ids: &[usize]) -> Vec<Service> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| create_service(index, location_id, None, None))
        .collect()
}

pub fn create_vehicle(index: usize, location_id: usize, latest_end: Option<f64>) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder
        .set_external_id(format!("vehicle_{index}"))
        .set_vehicle_type_id(0)
        .set_start_location_id(location_id)
        .set_return_to_depot(true);

    if let Some(latest_end) = latest_end {
        builder.set_earliest_start(0.0).set_latest_end(latest_end);
    }

    builder.build().unwrap()
}

pub struct ProblemSetup {
    pub locations: Vec<Location>,
    pub services: Vec<Service>,
    pub vehicles: Vec<Vehicle>,
    pub capacity: Option<f64>,
    pub fixed_cost: f64,
}

impl ProblemSetup {
    pub fn new(locations: Vec<Location>, services: Vec<Service>, vehicles: Vec<Vehicle>) -> Self {
        ProblemSetup {
            locations,
            services,
            vehicles,
            capacity: None,
            fixed_cost: 0.0,
        }
    }

    pub fn build(self) -> VehicleRoutingProblem {
        let mut vehicle_type = VehicleTypeBuilder::default();
        vehicle_type
            .set_external_id("van")
            .set_profile_id(0)
            .set_fixed_cost(self.fixed_cost);
        if let Some(capacity) = self.capacity {
            vehicle_type.set_capacity(Capacity::from_vec(vec![capacity]));
        }

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_vehicle_profiles(vec![VehicleProfile::new(
                "euclidean",
                TravelMatrices::from_euclidean(&self.locations),
            )])
            .set_vehicle_types(vec![vehicle_type.build().unwrap()])
            .set_locations(self.locations)
            .set_fleet(Fleet::Finite(self.vehicles))
            .set_services(self.services);

        builder.build().unwrap()
    }
}

/// Ten services spread over a 6x6 grid served from two opposite corners.
pub fn create_grid_problem() -> VehicleRoutingProblem {
    ProblemSetup::new(
        create_location_grid(6, 6),
        create_services(&[1, 5, 8, 14, 17, 22, 27, 30, 33, 35]),
        vec![create_vehicle(0, 0, None), create_vehicle(1, 35, None)],
    )
    .build()
}
