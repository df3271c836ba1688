use crate::{define_index_newtype, solver::solution::route::VehicleRoute};

define_index_newtype!(RouteIdx, VehicleRoute);
