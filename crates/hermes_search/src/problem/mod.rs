pub mod capacity;
pub mod costs;
pub mod driver;
pub mod fleet;
pub mod job;
pub mod location;
pub mod neighborhood;
pub mod service;
pub mod shipment;
pub mod skill;
pub mod time_window;
pub mod travel_cost_matrix;
pub mod vehicle;
pub mod vehicle_profile;
pub mod vehicle_routing_problem;
pub mod vehicle_type;
