use serde::Serialize;

use crate::define_index_newtype;

define_index_newtype!(DriverIdx, Driver);

/// Optional operator bound to a route, handed to the cost functions.
#[derive(Serialize, Debug, Clone)]
pub struct Driver {
    external_id: String,
}

impl Driver {
    pub fn new(external_id: impl Into<String>) -> Self {
        Driver {
            external_id: external_id.into(),
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }
}
