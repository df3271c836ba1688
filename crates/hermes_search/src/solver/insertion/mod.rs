pub mod cache;
pub mod calculator;
pub mod context;
mod insertion;

pub use insertion::{Insertion, InsertionData, ServiceInsertion, ShipmentInsertion};
